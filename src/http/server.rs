//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app that hands every request to the router
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bound the number of requests dispatched at once
//! - Buffer request bodies up to the configured limit
//! - Convert response descriptors into HTTP responses
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{to_bytes, Body},
    extract::{Request as HttpRequest, State},
    http::{HeaderName, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::Request;
use crate::http::request_id::{request_id, UuidRequestId};
use crate::http::response::ResponseDescriptor;
use crate::observability::metrics;
use crate::routing::Router;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub max_body_size: usize,
    /// One permit per request in flight, `listener.max_connections` in total.
    pub in_flight: Arc<Semaphore>,
}

/// HTTP listener serving one router.
pub struct HttpServer {
    app: axum::Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `router`.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        let state = AppState {
            router: Arc::new(router),
            max_body_size: config.security.max_body_size,
            in_flight: Arc::new(Semaphore::new(
                config.listener.max_connections.min(Semaphore::MAX_PERMITS),
            )),
        };

        let app = Self::build_app(&config, state);
        Self { app, config }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The Axum app, for serving elsewhere or testing in-process.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Run the server until `shutdown` fires, accepting connections on `listener`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler: every method and path ends up here.
async fn dispatch_handler(State(state): State<AppState>, request: HttpRequest) -> Response {
    let start = Instant::now();

    // Wait for a slot (backpressure). Held until the response is built.
    let _permit = match state.in_flight.acquire().await {
        Ok(permit) => permit,
        Err(_) => {
            return (StatusCode::SERVICE_UNAVAILABLE, "Server shutting down").into_response();
        }
    };

    let (parts, body) = request.into_parts();

    let method = parts.method.as_str().to_string();
    let target = request_target(&parts.uri);

    // Read failures other than the size limit (client gone mid-body) are
    // reported the same way; nobody is left to read the status.
    let body = match to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(method = %method, target = %target, error = %e, "Request body rejected");
            metrics::record_request(&method, 413, start);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let request = Request::from_parts(
        method,
        target,
        parts.headers,
        (!body.is_empty()).then_some(body),
    );

    let descriptor = state.router.dispatch(&request);

    tracing::debug!(
        request_id = request_id(&request).unwrap_or("unknown"),
        method = %request.method(),
        path = %request.path(),
        status = descriptor.status(),
        "Dispatched request"
    );

    let response = into_http_response(descriptor);
    metrics::record_request(request.method(), response.status().as_u16(), start);

    response
}

/// The target the router matches on.
///
/// Origin and absolute forms give their path and query. Authority form
/// (`CONNECT host:443`) has no path and is kept verbatim; it does not start
/// with `/`, so no registered route can match it.
fn request_target(uri: &Uri) -> String {
    match uri.path_and_query() {
        Some(pq) => pq.as_str().to_string(),
        None => uri.to_string(),
    }
}

/// Convert a descriptor into an HTTP response.
///
/// Header order is kept. Headers that are not valid HTTP are dropped, and a
/// status outside 100-599 turns the whole response into a 500.
pub fn into_http_response(descriptor: ResponseDescriptor) -> Response {
    let descriptor = if (100..=599).contains(&descriptor.status()) {
        descriptor
    } else {
        tracing::warn!(status = descriptor.status(), "Handler produced invalid status code");
        ResponseDescriptor::internal_error()
    };

    let (status, headers, body) = descriptor.into_parts();

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let map = response.headers_mut();
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            (Ok(name), Ok(value)) => {
                map.append(name, value);
            }
            _ => {
                tracing::warn!(header = %name, "Dropping invalid response header");
            }
        }
    }

    response
}
