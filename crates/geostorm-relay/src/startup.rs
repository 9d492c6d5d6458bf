//! Relay startup helper for embedding in another process.
//!
//! Provides [`spawn_relay`] which binds the listener eagerly, then runs
//! the relay on a background Tokio task. Binding before spawning means a
//! port clash is reported to the caller instead of only being logged.
//!
//! # Usage
//!
//! ```rust,ignore
//! use geostorm_relay::{ServerConfig, spawn_relay};
//!
//! let config = ServerConfig::default();
//! let relay = spawn_relay(&config, config.state()).await?;
//! println!("relay on {}", relay.addr);
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError, bind, serve};
use crate::state::RelayState;

/// Errors that can occur when spawning the relay.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A relay running on a background task.
#[derive(Debug)]
pub struct RunningRelay {
    /// The bound address (with the real port when `0` was requested).
    pub addr: SocketAddr,
    /// The serving task. Abort it to stop the relay.
    pub handle: JoinHandle<()>,
}

/// Bind and spawn the relay server on a background Tokio task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot
/// be bound.
pub async fn spawn_relay(
    config: &ServerConfig,
    state: Arc<RelayState>,
) -> Result<RunningRelay, StartupError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            tracing::error!(error = %e, "Relay server exited with error");
        }
    });

    tracing::info!(%addr, "Relay server spawned on background task");

    Ok(RunningRelay { addr, handle })
}
