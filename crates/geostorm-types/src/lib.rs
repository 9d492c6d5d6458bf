//! Shared type definitions for the Geostorm workspace.
//!
//! Everything that crosses a process boundary lives here: the JSON
//! messages exchanged between the magnetometer sensor and the viewer, the
//! role a relay connection is classified into, and connection identifiers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for relay connections
//! - [`enums`] -- Relay roles, compass directions, sensor command kinds
//! - [`messages`] -- Sensor readings and viewer commands as sent on the wire

pub mod enums;
pub mod ids;
pub mod messages;

pub use enums::{ClientRole, CommandKind, CompassDirection, ParseCommandError};
pub use ids::ConnectionId;
pub use messages::{SensorCommand, SensorMessage, SensorReading};
