use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::EnumIter;

/// The constant record backing one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub code: u16,
    pub title: &'static str,
    pub explanation: &'static str,
    pub empty_body: bool,
}

const fn entry(code: u16, title: &'static str, explanation: &'static str) -> StatusEntry {
    StatusEntry { code, title, explanation, empty_body: false }
}

const fn empty(code: u16, title: &'static str, explanation: &'static str) -> StatusEntry {
    StatusEntry { code, title, explanation, empty_body: true }
}

/// The closed catalog of supported HTTP statuses.
///
/// Each variant carries its numeric code, reason phrase, default explanation
/// text, and whether the status forbids a response body (204, 205, 304).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Status {
    Continue,
    SwitchingProtocols,
    Ok,
    Created,
    Accepted,
    NonAuthoritativeInformation,
    NoContent,
    ResetContent,
    PartialContent,
    MultipleChoices,
    MovedPermanently,
    Found,
    SeeOther,
    NotModified,
    UseProxy,
    TemporaryRedirect,
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    ProxyAuthenticationRequired,
    RequestTimeout,
    Conflict,
    Gone,
    LengthRequired,
    PreconditionFailed,
    RequestEntityTooLarge,
    RequestUriTooLong,
    UnsupportedMediaType,
    RequestedRangeNotSatisfiable,
    ExpectationFailed,
    UnprocessableEntity,
    Locked,
    FailedDependency,
    InternalServerError,
    NotImplemented,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    HttpVersionNotSupported,
    InsufficientStorage,
}

impl Status {
    pub const fn entry(&self) -> StatusEntry {
        match self {
            Status::Continue => entry(
                100,
                "Continue",
                "The client should continue with its request.",
            ),
            Status::SwitchingProtocols => entry(
                101,
                "Switching Protocols",
                "The server is switching protocols according to the Upgrade header.",
            ),
            Status::Ok => entry(200, "OK", "The request has succeeded."),
            Status::Created => entry(
                201,
                "Created",
                "The request has been fulfilled and resulted in a new resource being created.",
            ),
            Status::Accepted => entry(
                202,
                "Accepted",
                "The request has been accepted for processing, but the processing has not been completed.",
            ),
            Status::NonAuthoritativeInformation => entry(
                203,
                "Non-Authoritative Information",
                "The returned metainformation is not the definitive set as available from the origin server.",
            ),
            Status::NoContent => empty(
                204,
                "No Content",
                "The server has fulfilled the request but does not need to return an entity-body.",
            ),
            Status::ResetContent => empty(
                205,
                "Reset Content",
                "The server has fulfilled the request and the user agent should reset the document view.",
            ),
            Status::PartialContent => entry(
                206,
                "Partial Content",
                "The server has fulfilled the partial GET request for the resource.",
            ),
            Status::MultipleChoices => entry(
                300,
                "Multiple Choices",
                "The resource corresponds to any one of a set of representations, each with its own specific location.",
            ),
            Status::MovedPermanently => entry(
                301,
                "Moved Permanently",
                "The resource has been assigned a new permanent URI.",
            ),
            Status::Found => entry(
                302,
                "Found",
                "The resource resides temporarily under a different URI.",
            ),
            Status::SeeOther => entry(
                303,
                "See Other",
                "The response to the request can be found under a different URI.",
            ),
            Status::NotModified => empty(
                304,
                "Not Modified",
                "The resource has not been modified since the last request.",
            ),
            Status::UseProxy => entry(
                305,
                "Use Proxy",
                "The resource must be accessed through the proxy given by the Location field.",
            ),
            Status::TemporaryRedirect => entry(
                307,
                "Temporary Redirect",
                "The resource resides temporarily under a different URI.",
            ),
            Status::BadRequest => entry(
                400,
                "Bad Request",
                "The server could not comply with the request since it is either malformed or otherwise incorrect.",
            ),
            Status::Unauthorized => entry(
                401,
                "Unauthorized",
                "This server could not verify that you are authorized to access the document you requested.",
            ),
            Status::PaymentRequired => entry(
                402,
                "Payment Required",
                "Access was denied for financial reasons.",
            ),
            Status::Forbidden => entry(
                403,
                "Forbidden",
                "Access was denied to this resource.",
            ),
            Status::NotFound => entry(
                404,
                "Not Found",
                "The resource could not be found.",
            ),
            Status::MethodNotAllowed => entry(
                405,
                "Method Not Allowed",
                "The method is not allowed for this resource.",
            ),
            Status::NotAcceptable => entry(
                406,
                "Not Acceptable",
                "The resource could not be generated that was acceptable to your browser.",
            ),
            Status::ProxyAuthenticationRequired => entry(
                407,
                "Proxy Authentication Required",
                "Authentication with a local proxy is needed.",
            ),
            Status::RequestTimeout => entry(
                408,
                "Request Timeout",
                "The server has waited too long for the request to be sent by the client.",
            ),
            Status::Conflict => entry(
                409,
                "Conflict",
                "There was a conflict when trying to complete your request.",
            ),
            Status::Gone => entry(
                410,
                "Gone",
                "This resource is no longer available. No forwarding address is given.",
            ),
            Status::LengthRequired => entry(
                411,
                "Length Required",
                "A Content-Length header is required for this request.",
            ),
            Status::PreconditionFailed => entry(
                412,
                "Precondition Failed",
                "A precondition given in the request evaluated to false.",
            ),
            Status::RequestEntityTooLarge => entry(
                413,
                "Request Entity Too Large",
                "The body of your request was too large for this server.",
            ),
            Status::RequestUriTooLong => entry(
                414,
                "Request-URI Too Long",
                "The request URI was too long for this server.",
            ),
            Status::UnsupportedMediaType => entry(
                415,
                "Unsupported Media Type",
                "The request media type is not supported by this server.",
            ),
            Status::RequestedRangeNotSatisfiable => entry(
                416,
                "Requested Range Not Satisfiable",
                "The requested range is not available for this resource.",
            ),
            Status::ExpectationFailed => entry(
                417,
                "Expectation Failed",
                "An expectation given in the Expect header could not be met by this server.",
            ),
            Status::UnprocessableEntity => entry(
                422,
                "Unprocessable Entity",
                "The server was unable to process the contained instructions.",
            ),
            Status::Locked => entry(423, "Locked", "The resource is locked."),
            Status::FailedDependency => entry(
                424,
                "Failed Dependency",
                "The method could not be performed because the requested action depended on another action and that action failed.",
            ),
            Status::InternalServerError => entry(
                500,
                "Internal Server Error",
                "The server has either erred or is incapable of performing the requested operation.",
            ),
            Status::NotImplemented => entry(
                501,
                "Not Implemented",
                "The request method is not implemented for this server.",
            ),
            Status::BadGateway => entry(
                502,
                "Bad Gateway",
                "The server received an invalid response from an upstream server.",
            ),
            Status::ServiceUnavailable => entry(
                503,
                "Service Unavailable",
                "The server is currently unavailable. Please try again at a later time.",
            ),
            Status::GatewayTimeout => entry(
                504,
                "Gateway Timeout",
                "The gateway did not receive a timely response from an upstream server.",
            ),
            Status::HttpVersionNotSupported => entry(
                505,
                "HTTP Version Not Supported",
                "The HTTP version used in the request is not supported by this server.",
            ),
            Status::InsufficientStorage => entry(
                507,
                "Insufficient Storage",
                "There was not enough space to save the resource.",
            ),
        }
    }

    pub const fn code(&self) -> u16 {
        self.entry().code
    }

    pub const fn title(&self) -> &'static str {
        self.entry().title
    }

    pub const fn explanation(&self) -> &'static str {
        self.entry().explanation
    }

    /// Statuses that must never carry a body or content headers.
    pub const fn empty_body(&self) -> bool {
        self.entry().empty_body
    }

    /// Redirect statuses that carry a target in a `Location` header.
    pub const fn takes_location(&self) -> bool {
        matches!(self.code(), 300 | 301 | 302 | 303 | 305 | 307)
    }

    /// The status line, e.g. `404 Not Found`.
    pub fn status_line(&self) -> String {
        self.to_string()
    }

    pub fn as_http(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::from_u16(self.code())
            .expect("catalog codes are within the valid status range")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.title())
    }
}

impl From<Status> for axum::http::StatusCode {
    fn from(status: Status) -> Self {
        status.as_http()
    }
}

/// Statuses serialize as their numeric code.
impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = u16::deserialize(deserializer)?;
        crate::registry::lookup(code).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_data() {
        assert_eq!(Status::NotFound.code(), 404);
        assert_eq!(Status::NotFound.title(), "Not Found");
        assert_eq!(Status::NotFound.explanation(), "The resource could not be found.");
        assert!(!Status::NotFound.empty_body());
    }

    #[test]
    fn test_status_line() {
        assert_eq!(Status::Ok.status_line(), "200 OK");
        assert_eq!(Status::NotFound.to_string(), "404 Not Found");
    }

    #[test]
    fn test_empty_body_statuses() {
        assert!(Status::NoContent.empty_body());
        assert!(Status::ResetContent.empty_body());
        assert!(Status::NotModified.empty_body());
        assert!(!Status::Ok.empty_body());
    }

    #[test]
    fn test_takes_location() {
        for status in [
            Status::MultipleChoices,
            Status::MovedPermanently,
            Status::Found,
            Status::SeeOther,
            Status::UseProxy,
            Status::TemporaryRedirect,
        ] {
            assert!(status.takes_location(), "{status} should carry a location");
        }
        assert!(!Status::NotModified.takes_location());
        assert!(!Status::NotFound.takes_location());
    }

    #[test]
    fn test_as_http() {
        assert_eq!(Status::NotFound.as_http(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(
            axum::http::StatusCode::from(Status::InternalServerError),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let encoded = serde_json::to_value(Status::NotFound).unwrap();
        assert_eq!(encoded, serde_json::json!(404));
        let decoded: Status = serde_json::from_value(serde_json::json!(503)).unwrap();
        assert_eq!(decoded, Status::ServiceUnavailable);
        assert!(serde_json::from_value::<Status>(serde_json::json!(299)).is_err());
    }
}
