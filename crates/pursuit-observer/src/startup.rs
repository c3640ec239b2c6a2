//! Launch the Observer server next to the run loop.
//!
//! The engine calls [`spawn_observer`] before entering the tick loop. The
//! listener is bound eagerly so a taken port fails startup instead of
//! surfacing later as a log line from a background task.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::server::{self, ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the Observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A running Observer server.
#[derive(Debug)]
pub struct ObserverHandle {
    /// The address actually bound (differs from the config for port 0).
    pub addr: SocketAddr,
    /// The background serve task. Abort it on shutdown.
    pub task: JoinHandle<()>,
}

/// Bind `config` and serve `state` on a background Tokio task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot be
/// bound.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<ObserverHandle, StartupError> {
    let listener = server::bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let task = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state).await {
            error!(error = %e, "Observer server exited with error");
        }
    });

    info!(%addr, "Observer server spawned on background task");
    Ok(ObserverHandle { addr, task })
}
