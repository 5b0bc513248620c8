//! Request ID generation.
//!
//! Every request gets an `x-request-id` header (UUID v4) unless the client
//! already sent one. The same value is echoed on the response.

use axum::http::{self, HeaderValue};
use tower_http::request_id::{MakeRequestId, RequestId};

use crate::http::request::Request;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The request ID assigned to `request`, if any.
pub fn request_id(request: &Request) -> Option<&str> {
    request.header(X_REQUEST_ID)
}
