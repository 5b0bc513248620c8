//! Exact-match HTTP request router with a deterministic "not found" fallback.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::{HttpServer, Request, ResponseDescriptor};
pub use lifecycle::Shutdown;
pub use routing::{ConfigurationError, Method, Router};
