//! Response descriptors produced by the routing layer.
//!
//! # Responsibilities
//! - Carry status, ordered headers and body back to the listener
//! - Provide constructors for the common body formats (HTML, plaintext, JSON)
//! - Map handler failures to a 500 descriptor
//!
//! # Design Decisions
//! - Headers are a list, not a map: insertion order is the wire order
//! - Status is a plain integer; the listener decides what to do with
//!   values outside 100-599
//! - No wire concerns here (framing, content-length, keep-alive)

use serde::Serialize;

pub const CONTENT_TYPE: &str = "content-type";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

/// Status, headers and body for one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseDescriptor {
    /// An empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// `content-type: text/html` response.
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .header(CONTENT_TYPE, TEXT_HTML)
            .body(body.into())
    }

    /// `content-type: text/plain` response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .header(CONTENT_TYPE, TEXT_PLAIN)
            .body(body.into())
    }

    /// `content-type: application/json` response.
    ///
    /// A value that fails to serialize produces a 500 instead.
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self::new(status)
                .header(CONTENT_TYPE, APPLICATION_JSON)
                .body(bytes),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize JSON body");
                Self::internal_error()
            }
        }
    }

    /// The default "not found" response.
    pub fn not_found() -> Self {
        Self::html(404, "<h1>Not found</h1>")
    }

    /// The response used when a handler fails.
    pub fn internal_error() -> Self {
        Self::html(500, "<h1>Internal server error</h1>")
    }

    /// Append a header. Existing headers with the same name are kept.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of a header, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8, if it is.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn into_parts(self) -> (u16, Vec<(String, String)>, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

/// Conversion of handler return values into a [`ResponseDescriptor`].
pub trait IntoResponse {
    fn into_response(self) -> ResponseDescriptor;
}

impl IntoResponse for ResponseDescriptor {
    fn into_response(self) -> ResponseDescriptor {
        self
    }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: std::fmt::Display,
{
    fn into_response(self) -> ResponseDescriptor {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Handler returned an error");
                ResponseDescriptor::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_keep_insertion_order() {
        let res = ResponseDescriptor::new(200)
            .header("x-b", "2")
            .header("x-a", "1")
            .header("x-b", "3");

        let names: Vec<_> = res.headers().iter().map(|(n, v)| (n.as_str(), v.as_str())).collect();
        assert_eq!(names, vec![("x-b", "2"), ("x-a", "1"), ("x-b", "3")]);
        assert_eq!(res.header_value("X-B"), Some("2"));
    }

    #[test]
    fn html_and_text_set_content_type() {
        let res = ResponseDescriptor::html(200, "<h1>Hello</h1>");
        assert_eq!(res.status(), 200);
        assert_eq!(res.header_value("content-type"), Some("text/html"));
        assert_eq!(res.body_str(), Some("<h1>Hello</h1>"));

        let res = ResponseDescriptor::text(201, "created");
        assert_eq!(res.header_value("content-type"), Some("text/plain"));
        assert_eq!(res.status(), 201);
    }

    #[test]
    fn json_serializes_value() {
        #[derive(Serialize)]
        struct Greeting {
            message: &'static str,
        }

        let res = ResponseDescriptor::json(200, &Greeting { message: "hi" });
        assert_eq!(res.header_value("content-type"), Some("application/json"));
        assert_eq!(res.body_str(), Some(r#"{"message":"hi"}"#));
    }

    #[test]
    fn json_failure_becomes_500() {
        use std::collections::HashMap;

        // Non-string map keys cannot be serialized as JSON objects.
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);

        let res = ResponseDescriptor::json(200, &map);
        assert_eq!(res.status(), 500);
    }

    #[test]
    fn err_result_becomes_500() {
        let r: Result<ResponseDescriptor, String> = Err("boom".into());
        assert_eq!(r.into_response().status(), 500);

        let r: Result<ResponseDescriptor, String> = Ok(ResponseDescriptor::new(204));
        assert_eq!(r.into_response().status(), 204);
    }
}
