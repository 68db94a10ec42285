use std::collections::BTreeMap;
use std::fmt;

use crate::error::{PorticoError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A `${name}` substitution template.
///
/// Compilation splits the source into literal and placeholder segments and
/// never fails; an unterminated `${` is kept as literal text. Substitution
/// happens lazily against a string map and errors on the first placeholder
/// without a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn compile(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;
        while let Some(start) = rest.find("${") {
            literal.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) if end > 0 => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(after[..end].to_string()));
                    rest = &after[end + 1..];
                }
                Some(end) => {
                    // ${} carries no name, keep it verbatim
                    literal.push_str("${}");
                    rest = &after[end + 1..];
                }
                None => {
                    literal.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { source: source.to_string(), segments }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn substitute(&self, values: &BTreeMap<String, String>) -> Result<String> {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(name) => match values.get(name) {
                    Some(value) => output.push_str(value),
                    None => {
                        return Err(PorticoError::MissingSubstitution {
                            placeholder: name.clone(),
                        });
                    }
                },
            }
        }
        Ok(output)
    }
}

/// Stringify a value without any HTML escaping; `None` becomes the empty
/// string. Used for substitution values that must not be escaped.
pub fn no_escape<T: fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

/// Stringify and HTML-escape a value; `None` becomes the empty string.
pub fn html_escape<T: fmt::Display>(value: Option<T>) -> String {
    let text = no_escape(value);
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Ampersand-only escaping, applied to comment fields in every render mode.
pub fn escape_ampersand(value: &str) -> String {
    value.replace('&', "&amp;")
}
