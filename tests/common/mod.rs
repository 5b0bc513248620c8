//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::time::Duration;

use hello_router::app::tutorial_router;
use hello_router::config::{FallbackConfig, ServerConfig};
use hello_router::net;
use hello_router::{HttpServer, Router, Shutdown};

/// A running server and the handle that stops it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked");
        result.expect("server returned an error");
    }
}

/// Start `router` on an ephemeral port.
pub async fn start_server(router: Router, mut config: ServerConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".into();

    let listener = net::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, router);
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Start the tutorial site with default configuration.
#[allow(dead_code)]
pub async fn start_tutorial() -> TestServer {
    let router = tutorial_router(&FallbackConfig::default()).unwrap();
    start_server(router, ServerConfig::default()).await
}

/// A client that never reuses connections, so each test request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
