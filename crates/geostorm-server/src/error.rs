//! Error types for the relay server binary.

/// Top-level error for the relay server binary.
#[derive(Debug, thiserror::Error)]
pub enum ServerAppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: geostorm_core::config::ConfigError,
    },

    /// The relay could not bind or stopped with an I/O error.
    #[error("relay error: {source}")]
    Relay {
        /// The underlying server error.
        #[from]
        source: geostorm_relay::ServerError,
    },

    /// Installing the Ctrl-C handler failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
