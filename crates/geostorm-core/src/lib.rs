//! Configuration and timing primitives shared by the Geostorm binaries.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `geostorm-config.yaml` into
//!   strongly-typed structs, with environment overrides.
//! - [`timer`] -- Deterministic repeating timers ([`Interval`]) and
//!   fixed-offset stage schedules ([`Timeline`]) driven by a caller clock.
//!
//! [`Interval`]: timer::Interval
//! [`Timeline`]: timer::Timeline

pub mod config;
pub mod timer;

pub use config::{ConfigError, GeostormConfig};
pub use timer::{Interval, Timeline};
