//! Error types for the viewer binary.

use tokio_tungstenite::tungstenite;

/// Top-level error for the viewer binary.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: geostorm_core::config::ConfigError,
    },

    /// The scene graph lost a node it depends on.
    #[error("scene error: {source}")]
    Scene {
        /// The underlying scene error.
        #[from]
        source: geostorm_scene::SceneError,
    },

    /// The relay URL is not a usable `WebSocket` URL.
    #[error("invalid relay url: {source}")]
    RelayUrl {
        /// The underlying handshake error.
        #[from]
        source: tungstenite::Error,
    },

    /// The configured `User-Agent` is not a valid header value.
    #[error("invalid user agent: {source}")]
    UserAgent {
        /// The underlying header error.
        #[from]
        source: tungstenite::http::header::InvalidHeaderValue,
    },

    /// Reading stdin or installing the Ctrl-C handler failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
