//! Path validation and normalization for exact-match routing.
//!
//! # Responsibilities
//! - Validate route paths at registration time
//! - Strip query string and fragment from request targets
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No trailing-slash folding: `/a` and `/a/` are different routes
//! - No wildcards, no parameters: matching is string equality

use super::router::ConfigurationError;

/// Strip the query string and fragment from a request target.
pub fn normalize_path(target: &str) -> &str {
    match target.find(['?', '#']) {
        Some(end) => &target[..end],
        None => target,
    }
}

/// Check that `path` can be registered as a route.
///
/// It must start with `/` and contain no whitespace. `?` and `#` are
/// rejected too, since request paths never contain them after
/// normalization.
pub fn validate_route_path(path: &str) -> Result<(), ConfigurationError> {
    let malformed = |reason: &'static str| ConfigurationError::MalformedPath {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(malformed("must start with '/'"));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(malformed("must not contain whitespace"));
    }
    if path.contains(['?', '#']) {
        return Err(malformed("must not contain a query string or fragment"));
    }

    Ok(())
}
