//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route table from configuration
//! - Bind the listener
//! - Hand back a service ready to run
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Routes are registered before the listener is bound (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::routing::{RouteError, RouterOptions};
use crate::todos::{InMemoryTodoStore, TodoStore};
use crate::urls;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("route table: {0}")]
    Routes(#[from] RouteError),

    #[error("bind failed: {0}")]
    Bind(#[from] std::io::Error),
}

/// A bound, not yet running, service.
pub struct Service {
    server: HttpServer,
    listener: TcpListener,
}

impl Service {
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        self.server.run(self.listener, shutdown).await
    }
}

/// Build the application for `config` with a fresh in-memory store.
pub fn build_server(config: AppConfig) -> Result<HttpServer, RouteError> {
    let store: Arc<dyn TodoStore> = Arc::new(InMemoryTodoStore::new());
    let routes = urls::api_router(RouterOptions::from(&config.router), store)?;

    for route in routes.routes() {
        tracing::debug!(name = %route.name, pattern = %route.pattern, "Route registered");
    }

    Ok(HttpServer::new(config, routes))
}

/// Build the application and bind its listener.
pub async fn bind(config: AppConfig) -> Result<Service, StartupError> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = build_server(config)?;

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");
    Ok(Service { server, listener })
}
