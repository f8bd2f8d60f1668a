//! HTTP transport types for the translation service.
//!
//! # Design
//! Requests and responses are plain data. `TranslationApi` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; a `Transport` performs the single round-trip in between. Keeping
//! the I/O behind one trait method lets tests substitute a recording transport
//! and observe exactly which calls were (or were not) issued.

use thiserror::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL including any encoded query string. Form bodies
/// are already `application/x-www-form-urlencoded` and come with the matching
/// `content-type` entry in `headers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value whose name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Any status code is a valid response here; 4xx/5xx are not transport
/// failures.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Status in `[200, 400)`.
    pub fn is_transport_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// The request never produced a response (DNS, refused connection, timeout,
/// unreadable body).
#[derive(Debug, Clone, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Executes one `HttpRequest` and returns whatever response came back.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost/v1/translate".to_string(),
            headers: vec![("x-project-token".to_string(), "abc".to_string())],
            body: None,
        };
        assert_eq!(req.header("X-Project-Token"), Some("abc"));
        assert_eq!(req.header("x-locale"), None);
    }

    #[test]
    fn transport_success_covers_redirect_range() {
        let mut response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(response.is_transport_success());
        response.status = 399;
        assert!(response.is_transport_success());
        response.status = 400;
        assert!(!response.is_transport_success());
        response.status = 199;
        assert!(!response.is_transport_success());
    }
}
