use thiserror::Error;

pub type Result<T> = std::result::Result<T, PorticoError>;

#[derive(Debug, Error)]
pub enum PorticoError {
    #[error("Unknown HTTP status code: {code}")]
    UnknownStatusCode { code: u16 },

    #[error("No substitution value for placeholder: {placeholder}")]
    MissingSubstitution { placeholder: String },
}
