use std::error::Error;

use axum::response::{IntoResponse, Response};

use crate::exception::HttpException;
use crate::status::Status;

/// The ExceptionFilter trait
///
/// Filters handle errors thrown during request processing.
/// They must return a valid Response.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch an exception and return a response
    fn catch(&self, error: Box<dyn Error + Send + Sync>) -> Response;
}

/// The default exception filter.
///
/// An [`HttpException`] travelling through the error path is rendered as the
/// response it already is; any other error becomes a rendered 500 carrying
/// the error text as detail.
#[derive(Default)]
pub struct HttpExceptionFilter;

impl ExceptionFilter for HttpExceptionFilter {
    fn catch(&self, error: Box<dyn Error + Send + Sync>) -> Response {
        match error.downcast::<HttpException>() {
            Ok(exception) => {
                tracing::debug!(status = %exception.status(), "rendering raised exception response");
                (*exception).into_response()
            }
            Err(other) => {
                tracing::error!(error = %other, "unhandled error reached the exception filter");
                HttpException::new(Status::InternalServerError)
                    .with_detail(other.to_string())
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("database unreachable")]
    struct DummyError;

    #[test]
    fn test_catch_renders_http_exception_as_is() {
        let filter = HttpExceptionFilter;
        let raised = HttpException::new(Status::Forbidden).with_detail("not yours");
        let response = filter.catch(Box::new(raised));
        assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_catch_maps_other_errors_to_500() {
        let filter = HttpExceptionFilter;
        let response = filter.catch(Box::new(DummyError));
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_catch_keeps_the_error_text() {
        let filter = HttpExceptionFilter;
        let response = filter.catch(Box::new(DummyError));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("500 Internal Server Error"));
        assert!(text.contains("database unreachable"));
    }
}
