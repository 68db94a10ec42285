use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

use crate::error::{PorticoError, Result};
use crate::exception::HttpException;
use crate::status::Status;

static STATUS_MAP: Lazy<BTreeMap<u16, Status>> = Lazy::new(|| {
    Status::iter().map(|status| (status.code(), status)).collect()
});

/// The full code-to-status catalog. Built once, read-only after.
pub fn status_map() -> &'static BTreeMap<u16, Status> {
    &STATUS_MAP
}

/// Look up the status registered under `code`.
pub fn lookup(code: u16) -> Result<Status> {
    STATUS_MAP
        .get(&code)
        .copied()
        .ok_or(PorticoError::UnknownStatusCode { code })
}

/// Build an exception response for `code`.
///
/// Overrides (detail, headers, comment, body template, pre-set body,
/// location, ...) are applied with the builder methods on the returned
/// [`HttpException`]. An unsupported code is an error; no fallback status is
/// substituted.
pub fn exception_response(code: u16) -> Result<HttpException> {
    let status = lookup(code)?;
    tracing::debug!(code, "constructing exception response");
    Ok(HttpException::new(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_404() {
        assert_eq!(exception_response(404).unwrap().status(), Status::NotFound);
    }

    #[test]
    fn test_status_201() {
        assert_eq!(exception_response(201).unwrap().status(), Status::Created);
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        let err = exception_response(599).unwrap_err();
        assert!(matches!(err, PorticoError::UnknownStatusCode { code: 599 }));
        assert!(lookup(208).is_err());
        assert!(lookup(306).is_err());
    }

    #[test]
    fn test_extra_overrides() {
        use axum::http::header::{HeaderName, HeaderValue};

        let response = exception_response(404)
            .unwrap()
            .with_header(HeaderName::from_static("abc"), HeaderValue::from_static("def"));
        assert_eq!(response.headers().get("abc").unwrap(), "def");
    }

    #[test]
    fn test_every_entry_resolves_to_its_own_code() {
        let map = status_map();
        assert!(!map.is_empty());
        for (&code, &status) in map {
            assert_eq!(status.code(), code);
            assert_eq!(exception_response(code).unwrap().status(), status);
        }
    }

    #[test]
    fn test_catalog_size() {
        assert_eq!(status_map().len(), 44);
    }
}
