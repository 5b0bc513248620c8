//! Read-only request view handed to the router.
//!
//! # Responsibilities
//! - Hold method, request target, headers and buffered body
//! - Expose the normalized path used for route matching
//!
//! # Design Decisions
//! - Method stays a string: unknown methods must still reach the fallback
//! - Headers use `HeaderMap`, so lookups are case-insensitive
//! - The body is opaque bytes, never parsed here

use axum::body::Bytes;
use axum::http::header::IntoHeaderName;
use axum::http::{HeaderMap, HeaderValue};

use crate::routing::matcher::normalize_path;

/// A request as seen by the router and handlers.
#[derive(Debug, Clone, Default)]
pub struct Request {
    method: String,
    target: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Request {
    /// Create a request with no headers and no body.
    ///
    /// `target` is the raw request target and may carry a query string.
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn from_parts(
        method: impl Into<String>,
        target: impl Into<String>,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            headers,
            body,
        }
    }

    pub fn with_header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Raw request target, including any query string.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Path with query string and fragment removed.
    pub fn path(&self) -> &str {
        normalize_path(&self.target)
    }

    /// Query string without the leading `?`, if any.
    pub fn query(&self) -> Option<&str> {
        let without_fragment = self.target.split('#').next().unwrap_or_default();
        without_fragment.split_once('?').map(|(_, q)| q)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string. Missing or non-UTF-8 values give `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_drops_query_and_fragment() {
        let req = Request::new("GET", "/search?q=rust#top");
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query(), Some("q=rust"));
        assert_eq!(req.target(), "/search?q=rust#top");

        let req = Request::new("GET", "/plain");
        assert_eq!(req.query(), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = Request::new("GET", "/")
            .with_header("x-custom", HeaderValue::from_static("yes"));

        assert_eq!(req.header("x-custom"), Some("yes"));
        assert_eq!(req.header("X-CUSTOM"), Some("yes"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn body_is_optional() {
        let req = Request::new("POST", "/");
        assert!(req.body().is_none());

        let req = req.with_body("payload");
        assert_eq!(req.body().map(|b| b.as_ref()), Some(&b"payload"[..]));
    }
}
