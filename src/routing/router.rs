//! Route table and dispatch.
//!
//! # Responsibilities
//! - Store routes keyed by (method, path)
//! - Reject duplicate and malformed routes at registration time
//! - Resolve every request to exactly one response
//!
//! # Design Decisions
//! - Registration needs `&mut self`; a finished router is shared via `Arc`
//!   and never mutated again
//! - O(1) lookup via HashMap
//! - Unmatched requests go to the fallback handler, never to nothing
//! - Handler panics are caught and turned into a 500

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::matcher::validate_route_path;
use super::method::Method;
use crate::http::request::Request;
use crate::http::response::{IntoResponse, ResponseDescriptor};

/// Route table setup error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: Method, path: String },

    #[error("malformed route path {path:?}: {reason}")]
    MalformedPath { path: String, reason: &'static str },
}

type BoxedHandler = Arc<dyn Fn(&Request) -> ResponseDescriptor + Send + Sync + 'static>;

fn boxed<H, R>(handler: H) -> BoxedHandler
where
    H: Fn(&Request) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    Arc::new(move |req: &Request| handler(req).into_response())
}

/// A registered route.
#[derive(Clone)]
pub struct Route {
    method: Method,
    path: String,
    handler: BoxedHandler,
}

impl Route {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Exact-match router with a fallback handler.
#[derive(Clone)]
pub struct Router {
    routes: HashMap<(Method, String), Route>,
    fallback: BoxedHandler,
}

impl Router {
    /// An empty router whose fallback is the default 404 page.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            fallback: boxed(|_: &Request| ResponseDescriptor::not_found()),
        }
    }

    /// Register `handler` for `method` and `path`.
    ///
    /// On error the route table is left as it was.
    pub fn register<H, R>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
    ) -> Result<(), ConfigurationError>
    where
        H: Fn(&Request) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        validate_route_path(path)?;

        let key = (method, path.to_string());
        if self.routes.contains_key(&key) {
            return Err(ConfigurationError::DuplicateRoute {
                method,
                path: path.to_string(),
            });
        }

        let route = Route {
            method,
            path: path.to_string(),
            handler: boxed(handler),
        };
        self.routes.insert(key, route);

        Ok(())
    }

    /// Replace the handler used when no route matches.
    pub fn set_fallback<H, R>(&mut self, handler: H)
    where
        H: Fn(&Request) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        self.fallback = boxed(handler);
    }

    /// Resolve `request` to a response. Never fails.
    pub fn dispatch(&self, request: &Request) -> ResponseDescriptor {
        match self.lookup(request.method(), request.path()) {
            Some(route) => invoke(&route.handler, request),
            None => invoke(&self.fallback, request),
        }
    }

    /// The route for an exact method and (already normalized) path.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&Route> {
        let method: Method = method.parse().ok()?;
        self.routes.get(&(method, path.to_string()))
    }

    pub fn contains(&self, method: Method, path: &str) -> bool {
        self.routes.contains_key(&(method, path.to_string()))
    }

    /// Registered routes, sorted by path then method.
    pub fn routes(&self) -> Vec<&Route> {
        let mut routes: Vec<_> = self.routes.values().collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.cmp(&b.method)));
        routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes())
            .finish_non_exhaustive()
    }
}

fn invoke(handler: &BoxedHandler, request: &Request) -> ResponseDescriptor {
    match catch_unwind(AssertUnwindSafe(|| handler(request))) {
        Ok(response) => response,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());

            tracing::error!(
                method = %request.method(),
                path = %request.path(),
                panic = %message,
                "Handler panicked"
            );
            ResponseDescriptor::internal_error()
        }
    }
}
