//! # Portico
//!
//! HTTP exception responses for Rust web services.
//!
//! Portico provides a catalog of HTTP status responses that double as
//! raisable errors: each value carries a standard status code, headers, and
//! a lazily rendered body, so a handler can return one through its error
//! path and the framework can send it to the client as-is.
//!
//! ## Features
//!
//! - **Status catalog**: one value per well-known HTTP status (1xx–5xx),
//!   with code, reason phrase, default explanation, and empty-body rules
//! - **Exception-as-response**: `HttpException` implements both
//!   `std::error::Error` and `axum::response::IntoResponse`
//! - **Content negotiation**: plain-text or HTML bodies selected from the
//!   request's accept header
//! - **Templated rendering**: `${name}` body templates substituted with the
//!   status line, explanation, detail, comment, and request environ
//! - **Registry + factory**: build a response from a bare numeric code
//!
//! ## Quick Start
//!
//! ```rust
//! use portico::{Environ, HttpException, Status, environ};
//!
//! // A handler decides a resource is missing:
//! let exc = HttpException::new(Status::NotFound).with_detail("no such user");
//!
//! // The framework renders it against the request environment:
//! let mut env = Environ::new();
//! env.insert(environ::REQUEST_METHOD, "GET");
//!
//! let mut status_line = String::new();
//! let body: Vec<u8> = exc
//!     .call(&env, |status, _headers| status_line = status.to_string())
//!     .unwrap()
//!     .flatten()
//!     .collect();
//!
//! assert_eq!(status_line, "404 Not Found");
//! assert!(String::from_utf8(body).unwrap().contains("no such user"));
//! ```
//!
//! With axum, an `HttpException` is returned straight from a handler:
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use portico::{HttpException, Status};
//!
//! async fn get_user() -> Result<String, HttpException> {
//!     Err(HttpException::new(Status::NotFound).with_detail("no such user"))
//! }
//!
//! let app: Router = Router::new().route("/users/{id}", get(get_user));
//! ```

pub mod environ;
pub mod error;
pub mod exception;
pub mod registry;
pub mod status;
pub mod template;
pub mod view;

// Re-export core types
pub use environ::Environ;
pub use error::{PorticoError, Result};
pub use exception::filter::{ExceptionFilter, HttpExceptionFilter};
pub use exception::{AppIter, HttpException, TEXT_HTML, TEXT_PLAIN};
pub use registry::{exception_response, lookup, status_map};
pub use status::{Status, StatusEntry};
pub use template::Template;
pub use view::default_exception_view;

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use portico::prelude::*;
/// ```
pub mod prelude {
    pub use crate::environ::Environ;
    pub use crate::error::{PorticoError, Result};
    pub use crate::exception::filter::{ExceptionFilter, HttpExceptionFilter};
    pub use crate::exception::{AppIter, HttpException, TEXT_HTML, TEXT_PLAIN};
    pub use crate::registry::{exception_response, lookup, status_map};
    pub use crate::status::{Status, StatusEntry};
    pub use crate::template::Template;
    pub use crate::view::default_exception_view;
    pub use axum::http::{HeaderMap, StatusCode};
    pub use axum::response::{IntoResponse, Response};
}
