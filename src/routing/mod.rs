//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, target, headers, body)
//!     → matcher.rs (strip query string and fragment)
//!     → router.rs (exact (method, path) lookup)
//!     → Return: handler response, or fallback response
//!
//! Route Registration (at startup):
//!     register(method, path, handler)
//!     → matcher.rs (validate path)
//!     → reject duplicates
//!     → Freeze by sharing as Arc<Router>
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Pure string equality, no wildcards or parameters
//! - Deterministic: same input always yields the same route
//! - Every dispatch yields exactly one response

pub mod matcher;
pub mod method;
pub mod router;

pub use method::{Method, ParseMethodError};
pub use router::{ConfigurationError, Route, Router};
