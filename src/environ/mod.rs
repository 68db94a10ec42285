use std::collections::BTreeMap;

use axum::http::request::Parts;

use crate::exception::HttpException;

pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
pub const REQUEST_SCHEME: &str = "REQUEST_SCHEME";
pub const SERVER_NAME: &str = "SERVER_NAME";
pub const SERVER_PORT: &str = "SERVER_PORT";
pub const PATH_INFO: &str = "PATH_INFO";
pub const HTTP_ACCEPT: &str = "HTTP_ACCEPT";

/// CGI-style request environment.
///
/// A string mapping of request metadata (`REQUEST_METHOD`, `HTTP_ACCEPT`,
/// `SERVER_NAME`, ...) handed to the render operation, plus a slot for the
/// exception raised while handling the request, consumed by
/// [`crate::view::default_exception_view`].
#[derive(Debug, Clone, Default)]
pub struct Environ {
    vars: BTreeMap<String, String>,
    exception: Option<HttpException>,
}

impl Environ {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an environ from axum request parts. Headers are mapped to
    /// `HTTP_*` keys the CGI way (`Accept` becomes `HTTP_ACCEPT`).
    pub fn from_parts(parts: &Parts) -> Self {
        let mut environ = Self::new();
        environ.insert(REQUEST_METHOD, parts.method.as_str());
        environ.insert(PATH_INFO, parts.uri.path());
        if let Some(scheme) = parts.uri.scheme_str() {
            environ.insert(REQUEST_SCHEME, scheme);
        }
        if let Some(host) = parts.uri.host() {
            environ.insert(SERVER_NAME, host);
        }
        if let Some(port) = parts.uri.port_u16() {
            environ.insert(SERVER_PORT, port.to_string());
        }
        for (name, value) in &parts.headers {
            let key = format!("HTTP_{}", name.as_str().to_uppercase().replace('-', "_"));
            environ.insert(key, String::from_utf8_lossy(value.as_bytes()));
        }
        environ
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn request_method(&self) -> Option<&str> {
        self.get(REQUEST_METHOD)
    }

    pub fn accept(&self) -> Option<&str> {
        self.get(HTTP_ACCEPT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }

    /// Attach the exception raised while handling this request.
    pub fn attach_exception(&mut self, exception: HttpException) {
        self.exception = Some(exception);
    }

    pub fn exception(&self) -> Option<&HttpException> {
        self.exception.as_ref()
    }

    pub fn take_exception(&mut self) -> Option<HttpException> {
        self.exception.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_insert_and_get() {
        let mut environ = Environ::new();
        environ.insert(REQUEST_METHOD, "GET");
        environ.insert(HTTP_ACCEPT, "text/html");
        assert_eq!(environ.request_method(), Some("GET"));
        assert_eq!(environ.accept(), Some("text/html"));
        assert_eq!(environ.get("SERVER_NAME"), None);
    }

    #[test]
    fn test_from_parts() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("http://localhost:8080/users")
            .header("accept", "text/html")
            .header("x-request-id", "abc123")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();
        let environ = Environ::from_parts(&parts);
        assert_eq!(environ.request_method(), Some("POST"));
        assert_eq!(environ.get(REQUEST_SCHEME), Some("http"));
        assert_eq!(environ.get(SERVER_NAME), Some("localhost"));
        assert_eq!(environ.get(SERVER_PORT), Some("8080"));
        assert_eq!(environ.get(PATH_INFO), Some("/users"));
        assert_eq!(environ.accept(), Some("text/html"));
        assert_eq!(environ.get("HTTP_X_REQUEST_ID"), Some("abc123"));
    }

    #[test]
    fn test_exception_slot() {
        let mut environ = Environ::new();
        assert!(environ.exception().is_none());
        environ.attach_exception(HttpException::new(Status::NotFound));
        assert_eq!(environ.exception().unwrap().status(), Status::NotFound);
        let taken = environ.take_exception().unwrap();
        assert_eq!(taken.status(), Status::NotFound);
        assert!(environ.exception().is_none());
    }
}
