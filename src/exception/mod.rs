use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::environ::Environ;
use crate::error::Result;
use crate::status::Status;
use crate::template::{self, Template};

pub mod filter;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";

const DEFAULT_BODY_TEMPLATE: &str = "${explanation}${br}${br}\n${detail}\n${html_comment}\n";

/// Stringify `value`, applying per-mode escaping: HTML-escaped in HTML
/// mode and left unescaped in plain mode.
#[inline]
fn mode_escape<T: fmt::Display>(value: T, html: bool) -> String {
    if html {
        template::html_escape(Some(value))
    } else {
        template::no_escape(Some(value))
    }
}

const PLAIN_PAGE_TEMPLATE: &str = "${status}\n\n${body}";

const HTML_PAGE_TEMPLATE: &str = "\
<html>\n \
<head>\n  \
<title>${status}</title>\n \
</head>\n \
<body>\n  \
<h1>${status}</h1>\n  \
${body}\n \
</body>\n\
</html>";

static DEFAULT_BODY: Lazy<Template> = Lazy::new(|| Template::compile(DEFAULT_BODY_TEMPLATE));
static PLAIN_PAGE: Lazy<Template> = Lazy::new(|| Template::compile(PLAIN_PAGE_TEMPLATE));
static HTML_PAGE: Lazy<Template> = Lazy::new(|| Template::compile(HTML_PAGE_TEMPLATE));

/// An HTTP status as a raisable, self-rendering response value.
///
/// An `HttpException` is both a response (status line, headers, body-producing
/// render operation) and an error (`Display` + `std::error::Error`), so a
/// handler can return it through its error path and the framework can render
/// it as-is.
///
/// The body is produced lazily at render time: the requested content type is
/// negotiated between plain text and HTML, and the body template is
/// substituted with the status line, explanation, detail, comment and the
/// request environ. A pre-set body suppresses rendering entirely.
#[derive(Debug, Clone)]
pub struct HttpException {
    status: Status,
    detail: Option<String>,
    comment: Option<String>,
    explanation: Option<String>,
    headers: HeaderMap,
    body_template: Option<Template>,
    payload: Option<Vec<Bytes>>,
    content_type: Option<String>,
    location: Option<String>,
    result: Option<Value>,
}

impl HttpException {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            detail: None,
            comment: None,
            explanation: None,
            headers: HeaderMap::new(),
            body_template: None,
            payload: None,
            content_type: None,
            // redirect statuses always expose a location, initially empty
            location: status.takes_location().then(String::new),
            result: None,
        }
    }

    /// Human-oriented detail appended to the default explanation.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Server-side comment. Rendered inside an HTML comment node in HTML
    /// mode; ampersands are escaped in every mode.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Replace the status' default explanation text for this instance.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Append a header. Supplied headers extend the instance's defaults,
    /// they never replace them.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (HeaderName, HeaderValue)>,
    {
        for (name, value) in headers {
            self.headers.append(name, value);
        }
        self
    }

    /// Replace the default body template. Compiled immediately; substitution
    /// errors surface at render time.
    pub fn with_body_template(mut self, source: &str) -> Self {
        self.body_template = Some(Template::compile(source));
        self
    }

    /// Pre-set the body. Suppresses templated rendering and content
    /// negotiation; the payload is emitted verbatim.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.payload = Some(vec![body.into()]);
        self
    }

    /// Pre-set the body from text. Same contract as [`Self::with_body`].
    pub fn with_text_body(mut self, body: impl Into<String>) -> Self {
        self.payload = Some(vec![Bytes::from(body.into())]);
        self
    }

    /// Pre-set the body as a chunk sequence. Same contract as
    /// [`Self::with_body`].
    pub fn with_app_iter<I, B>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.payload = Some(chunks.into_iter().map(Into::into).collect());
        self
    }

    /// Force the rendered content type instead of negotiating it from the
    /// accept header. Ignored for empty-body statuses, which never carry a
    /// media type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        if !self.status.empty_body() {
            self.content_type = Some(content_type.into());
        }
        self
    }

    /// Redirect target, mirrored into a `Location` header when non-empty.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Diagnostic payload attached by an authorization layer. Never rendered
    /// into the body.
    pub fn with_result(mut self, result: impl Into<Value>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The explanation rendered for this instance: the per-instance override
    /// if one was set, else the status' default text.
    pub fn explanation(&self) -> &str {
        self.explanation.as_deref().unwrap_or(self.status.explanation())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_template(&self) -> Option<&Template> {
        self.body_template.as_ref()
    }

    /// The pre-set body chunks, if any.
    pub fn app_iter(&self) -> Option<&[Bytes]> {
        self.payload.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Render this exception as a response.
    ///
    /// `start_response` receives the status line and the ordered header
    /// list; the returned [`AppIter`] yields the body as a single chunk (or
    /// the pre-set chunks verbatim) and is not restartable.
    pub fn call<F>(&self, environ: &Environ, start_response: F) -> Result<AppIter>
    where
        F: FnOnce(&str, &[(String, String)]),
    {
        let status_line = self.status.status_line();

        if self.status.empty_body() {
            start_response(&status_line, &self.header_list(None, None));
            return Ok(AppIter::single(Bytes::new()));
        }

        if let Some(chunks) = &self.payload {
            let length = chunks.iter().map(Bytes::len).sum();
            let content_type = self.content_type.clone();
            start_response(&status_line, &self.header_list(content_type, Some(length)));
            return Ok(AppIter::from_chunks(chunks.clone()));
        }

        let content_type = self.negotiated_content_type(environ);
        let html = content_type.contains("html");
        let page = self.render_page(environ, &status_line, html)?;
        tracing::trace!(status = %status_line, content_type, "rendered exception body");
        let headers = self.header_list(
            Some(format!("{content_type}; charset=UTF-8")),
            Some(page.len()),
        );
        start_response(&status_line, &headers);
        Ok(AppIter::single(Bytes::from(page)))
    }

    fn negotiated_content_type(&self, environ: &Environ) -> &str {
        if let Some(forced) = self.content_type.as_deref() {
            return forced;
        }
        // Only an accept value naming html selects the HTML rendition;
        // */*, an absent header, and everything else stay plain text.
        match environ.accept() {
            Some(accept) if accept.contains("html") => TEXT_HTML,
            _ => TEXT_PLAIN,
        }
    }

    fn render_page(&self, environ: &Environ, status_line: &str, html: bool) -> Result<String> {
        let comment = self.comment.as_deref().unwrap_or("");
        let escaped_comment = template::escape_ampersand(comment);
        let html_comment = if html && !comment.is_empty() {
            format!("<!-- {escaped_comment} -->")
        } else {
            escaped_comment.clone()
        };
        let detail = self.detail.as_deref().unwrap_or("");

        let mut args: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in environ.iter() {
            args.insert(key.clone(), mode_escape(value, html));
        }
        args.insert("br".into(), if html { "<br/>" } else { "\n" }.into());
        args.insert("status".into(), status_line.to_string());
        args.insert("explanation".into(), mode_escape(self.explanation(), html));
        // detail is escaped in HTML mode only; comment above stays
        // ampersand-escaped in both modes
        args.insert(
            "detail".into(),
            if html { template::html_escape(Some(detail)) } else { detail.to_string() },
        );
        args.insert("comment".into(), escaped_comment);
        args.insert("html_comment".into(), html_comment);

        let body = match &self.body_template {
            Some(custom) => custom.substitute(&args)?,
            None => DEFAULT_BODY.substitute(&args)?,
        };

        let mut page_args = BTreeMap::new();
        page_args.insert("status".to_string(), status_line.to_string());
        page_args.insert("body".to_string(), body);
        let page_template = if html { &HTML_PAGE } else { &PLAIN_PAGE };
        page_template.substitute(&page_args)
    }

    fn header_list(
        &self,
        content_type: Option<String>,
        content_length: Option<usize>,
    ) -> Vec<(String, String)> {
        let mut list: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        if let Some(location) = self.location.as_deref() {
            if !location.is_empty() {
                list.push(("location".to_string(), location.to_string()));
            }
        }
        if let Some(content_type) = content_type {
            list.push(("content-type".to_string(), content_type));
        }
        if let Some(length) = content_length {
            list.push(("content-length".to_string(), length.to_string()));
        }
        list
    }
}

impl fmt::Display for HttpException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self
            .detail
            .as_deref()
            .filter(|detail| !detail.is_empty())
            .unwrap_or_else(|| self.explanation());
        f.write_str(message)
    }
}

impl std::error::Error for HttpException {}

impl IntoResponse for HttpException {
    fn into_response(self) -> Response {
        // No request at hand here, so negotiation sees an empty environ and
        // the body renders in plain-text mode unless a content type was
        // forced on the instance.
        let environ = Environ::new();
        let mut header_pairs: Vec<(String, String)> = Vec::new();
        let body = match self.call(&environ, |_, headers| header_pairs = headers.to_vec()) {
            Ok(chunks) => chunks.fold(Vec::new(), |mut body, chunk| {
                body.extend_from_slice(&chunk);
                body
            }),
            Err(error) => {
                tracing::error!(%error, "failed to render exception response");
                return (axum::http::StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
                    .into_response();
            }
        };

        let mut builder = Response::builder().status(self.status.as_http());
        for (name, value) in &header_pairs {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(Body::from(body))
            .unwrap_or_else(|error| {
                tracing::error!(%error, "failed to assemble exception response");
                axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })
    }
}

/// One-shot body sequence produced by [`HttpException::call`]. Finite and
/// not restartable.
#[derive(Debug)]
pub struct AppIter {
    chunks: VecDeque<Bytes>,
}

impl AppIter {
    fn single(chunk: Bytes) -> Self {
        Self { chunks: VecDeque::from([chunk]) }
    }

    fn from_chunks(chunks: Vec<Bytes>) -> Self {
        Self { chunks: chunks.into() }
    }
}

impl Iterator for AppIter {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        self.chunks.pop_front()
    }
}
