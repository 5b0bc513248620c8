//! The tutorial site: a greeting page, a goodbye page, and the same greeting
//! as plaintext and JSON.

use serde::Serialize;

use crate::config::FallbackConfig;
use crate::http::{Request, ResponseDescriptor};
use crate::routing::{ConfigurationError, Method, Router};

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

fn hello(_: &Request) -> ResponseDescriptor {
    ResponseDescriptor::html(200, "<h1>Hello</h1>")
}

fn goodbye(_: &Request) -> ResponseDescriptor {
    ResponseDescriptor::html(200, "<h1>Goodbye</h1>")
}

fn plain(_: &Request) -> ResponseDescriptor {
    ResponseDescriptor::text(200, "Hello, world!")
}

fn json(_: &Request) -> ResponseDescriptor {
    ResponseDescriptor::json(200, &Message { message: "Hello, world!" })
}

/// Build the tutorial route table, answering unmatched requests with `fallback`.
pub fn tutorial_router(fallback: &FallbackConfig) -> Result<Router, ConfigurationError> {
    let mut router = Router::new();

    router.register(Method::Get, "/", hello)?;
    router.register(Method::Get, "/goodbye", goodbye)?;
    router.register(Method::Get, "/plain", plain)?;
    router.register(Method::Get, "/json", json)?;

    let not_found = fallback.to_response();
    router.set_fallback(move |_: &Request| not_found.clone());

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch(router: &Router, method: &str, target: &str) -> ResponseDescriptor {
        router.dispatch(&Request::new(method, target))
    }

    #[test]
    fn tutorial_scenario() {
        let router = tutorial_router(&FallbackConfig::default()).unwrap();

        let res = dispatch(&router, "GET", "/");
        assert_eq!(res, ResponseDescriptor::html(200, "<h1>Hello</h1>"));

        let res = dispatch(&router, "GET", "/goodbye");
        assert_eq!(res, ResponseDescriptor::html(200, "<h1>Goodbye</h1>"));

        let res = dispatch(&router, "GET", "/missing");
        assert_eq!(res.status(), 404);
        assert_eq!(res.body_str(), Some("<h1>Not found</h1>"));

        assert_eq!(dispatch(&router, "POST", "/").status(), 404);
    }

    #[test]
    fn body_formats() {
        let router = tutorial_router(&FallbackConfig::default()).unwrap();

        let res = dispatch(&router, "GET", "/plain");
        assert_eq!(res.header_value("content-type"), Some("text/plain"));
        assert_eq!(res.body_str(), Some("Hello, world!"));

        let res = dispatch(&router, "GET", "/json");
        assert_eq!(res.header_value("content-type"), Some("application/json"));
        let value: serde_json::Value = serde_json::from_slice(res.body_bytes()).unwrap();
        assert_eq!(value["message"], "Hello, world!");
    }

    #[test]
    fn configured_fallback_is_used() {
        let fallback = FallbackConfig {
            status: 410,
            content_type: "text/plain".into(),
            body: "gone".into(),
        };
        let router = tutorial_router(&fallback).unwrap();

        let res = dispatch(&router, "GET", "/nope");
        assert_eq!(res.status(), 410);
        assert_eq!(res.header_value("content-type"), Some("text/plain"));
        assert_eq!(res.body_str(), Some("gone"));
    }
}
