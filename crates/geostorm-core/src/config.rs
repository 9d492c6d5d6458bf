//! Configuration loading and typed config structures for Geostorm.
//!
//! The configuration lives in `geostorm-config.yaml` at the project root.
//! Every section and field is optional; missing values fall back to the
//! defaults below, which reproduce the stock deployment (relay on
//! `0.0.0.0:3000`, sensor publishing every 500 ms, viewer running the
//! synthetic feed).

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidOverride {
        /// The environment variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeostormConfig {
    /// Relay server settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Simulated sensor client settings.
    #[serde(default)]
    pub sensor: SensorConfig,

    /// Headless viewer settings.
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GeostormConfig {
    /// Load configuration from a YAML file and apply environment overrides.
    ///
    /// Recognised variables:
    /// - `RELAY_HOST` overrides `relay.host`
    /// - `RELAY_PORT` overrides `relay.port`
    /// - `RELAY_STATIC_DIR` overrides `relay.static_dir`
    /// - `RELAY_URL` overrides `sensor.relay_url` and `viewer.relay_url`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] for an unparseable `RELAY_PORT`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from defaults. Environment
    /// overrides are applied either way.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from a variable lookup (normally the process
    /// environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(host) = lookup("RELAY_HOST") {
            self.relay.host = host;
        }
        if let Some(port) = lookup("RELAY_PORT") {
            let Ok(parsed) = port.parse() else {
                return Err(ConfigError::InvalidOverride {
                    key: "RELAY_PORT",
                    value: port,
                });
            };
            self.relay.port = parsed;
        }
        if let Some(dir) = lookup("RELAY_STATIC_DIR") {
            self.relay.static_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("RELAY_URL") {
            self.sensor.relay_url.clone_from(&url);
            self.viewer.relay_url = url;
        }
        Ok(())
    }
}

/// Relay server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayConfig {
    /// Address to bind.
    #[serde(default = "default_relay_host")]
    pub host: String,

    /// HTTP port serving `/ws` and the static files.
    #[serde(default = "default_relay_port")]
    pub port: u16,

    /// Directory of static files served at `/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// `User-Agent` substring that marks a connection as the viewer.
    #[serde(default = "default_viewer_marker")]
    pub viewer_marker: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_relay_host(),
            port: default_relay_port(),
            static_dir: default_static_dir(),
            viewer_marker: default_viewer_marker(),
        }
    }
}

/// Simulated sensor client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SensorConfig {
    /// `WebSocket` URL of the relay.
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// `User-Agent` sent on connect. Must not contain the viewer marker.
    #[serde(default = "default_sensor_user_agent")]
    pub user_agent: String,

    /// Milliseconds between readings.
    #[serde(default = "default_send_interval_ms")]
    pub send_interval_ms: u64,

    /// Milliseconds to wait before reconnecting after a drop.
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,

    /// Seed for the magnetometer random walk.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            user_agent: default_sensor_user_agent(),
            send_interval_ms: default_send_interval_ms(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            seed: default_seed(),
        }
    }
}

/// Headless viewer settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewerConfig {
    /// `WebSocket` URL of the relay.
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// `User-Agent` sent on connect. Must contain the viewer marker.
    #[serde(default = "default_viewer_user_agent")]
    pub user_agent: String,

    /// Connect to the relay and display live readings instead of the
    /// synthetic feed.
    #[serde(default)]
    pub live_feed: bool,

    /// Milliseconds between animation frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Milliseconds between synthetic samples.
    #[serde(default = "default_send_interval_ms")]
    pub sample_interval_ms: u64,

    /// Live readings above this strength (µT) start the sun-wave sequence.
    #[serde(default = "default_storm_threshold_ut")]
    pub storm_threshold_ut: f64,

    /// Seed for the synthetic feed.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            user_agent: default_viewer_user_agent(),
            live_feed: false,
            frame_interval_ms: default_frame_interval_ms(),
            sample_interval_ms: default_send_interval_ms(),
            storm_threshold_ut: default_storm_threshold_ut(),
            seed: default_seed(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_relay_host() -> String {
    String::from("0.0.0.0")
}

const fn default_relay_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_viewer_marker() -> String {
    String::from("Mozilla")
}

fn default_relay_url() -> String {
    String::from("ws://127.0.0.1:3000/ws")
}

fn default_sensor_user_agent() -> String {
    String::from("geostorm-sensor/0.1")
}

fn default_viewer_user_agent() -> String {
    String::from("Mozilla/5.0 (compatible; geostorm-viewer/0.1)")
}

const fn default_send_interval_ms() -> u64 {
    500
}

const fn default_reconnect_interval_ms() -> u64 {
    3000
}

const fn default_frame_interval_ms() -> u64 {
    16
}

const fn default_storm_threshold_ut() -> f64 {
    55.0
}

const fn default_seed() -> u64 {
    42
}

fn default_log_level() -> String {
    String::from("info")
}
