//! Error types for the sensor binary.

use tokio_tungstenite::tungstenite;

/// Top-level error for the sensor binary.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: geostorm_core::config::ConfigError,
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

    /// Installing the Ctrl-C handler failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
