//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, body buffering)
//!     → request.rs (method, target, headers, body view)
//!     → [routing layer resolves handler or fallback]
//!     → response.rs (status, ordered headers, body)
//!     → server.rs (convert and send to client)
//! ```

pub mod request;
pub mod request_id;
pub mod response;
pub mod server;

pub use request::Request;
pub use request_id::{request_id, UuidRequestId, X_REQUEST_ID};
pub use response::{IntoResponse, ResponseDescriptor};
pub use server::HttpServer;
