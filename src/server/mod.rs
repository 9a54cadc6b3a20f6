//! HTTP server exposing the packaging endpoints.

mod packaging;

pub use packaging::{ApiError, SaveQuery};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::settings::SettingsRepository;
use crate::{Error, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Settings repository; the lock spans each upsert and its file write
    pub repository: Arc<Mutex<SettingsRepository>>,
}

impl AppState {
    pub fn new(repository: SettingsRepository) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
        }
    }
}

/// Build the router with all packaging routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/packaging/save/:project", post(packaging::save_project))
        .route("/packaging/:project", get(packaging::get_project))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to `host:port` and serve until Ctrl+C.
pub async fn start_server(state: AppState, host: &str, port: u16) -> Result<()> {
    let host_addr: std::net::IpAddr = host
        .parse()
        .map_err(|e| Error::InvalidInput(format!("Invalid host address '{}': {}", host, e)))?;
    let addr = SocketAddr::from((host_addr, port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler, run until killed
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
