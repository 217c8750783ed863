//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use todo_backend::config::AppConfig;
use todo_backend::lifecycle::{self, Shutdown};

/// Config bound to an ephemeral local port.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config
}

/// Start the service on an ephemeral port.
///
/// Returns the bound address and the shutdown handle that stops it.
#[allow(dead_code)]
pub async fn spawn_app(config: AppConfig) -> (SocketAddr, Shutdown) {
    let service = lifecycle::bind(config).await.unwrap();
    let addr = service.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = service.run(rx).await;
    });

    (addr, shutdown)
}

/// The fully layered router, for in-process requests.
#[allow(dead_code)]
pub fn app(config: AppConfig) -> Router {
    lifecycle::build_server(config).unwrap().router()
}

/// Send one request through `app` without a socket.
#[allow(dead_code)]
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "testserver");
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Collect a response body as JSON (`Null` when empty).
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
