//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C) or SIGTERM
//! - Translate the signal into a shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A handler that fails to install is logged and never fires

use crate::lifecycle::Shutdown;

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Wait for a termination signal.
pub async fn wait_for_signal() {
    tokio::select! {
        _ = ctrl_c() => tracing::info!("SIGINT received"),
        _ = terminate() => tracing::info!("SIGTERM received"),
    }
}

/// Trigger `shutdown` once a termination signal arrives.
pub fn spawn_signal_listener(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    })
}
