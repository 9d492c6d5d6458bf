//! Relay server binary for Geostorm.
//!
//! Serves the viewer page and the `/ws` relay on one port. The sensor and
//! the browser both connect to `/ws`; the relay tells them apart by
//! `User-Agent` and forwards frames between them.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `geostorm-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing), `RUST_LOG` first
//! 3. Bind the relay and serve until Ctrl-C

mod error;

use std::path::Path;

use geostorm_core::config::GeostormConfig;
use geostorm_relay::{ServerConfig, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ServerAppError;

const CONFIG_PATH: &str = "geostorm-config.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await?;
    Ok(())
}

async fn run() -> Result<(), ServerAppError> {
    let config = GeostormConfig::load_or_default(Path::new(CONFIG_PATH))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("geostorm-server starting");

    let server_config = ServerConfig::from(&config.relay);
    info!(
        host = %server_config.host,
        port = server_config.port,
        static_dir = %server_config.static_dir.display(),
        viewer_marker = %server_config.viewer_marker,
        "Configuration loaded"
    );

    let state = server_config.state();
    tokio::select! {
        result = start_server(&server_config, state) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Ctrl-C received, shutting down");
        }
    }

    info!("geostorm-server shutdown complete");
    Ok(())
}
