//! JSON messages exchanged between the sensor and the viewer.
//!
//! The relay never looks inside these; only the two endpoints do.
//!
//! Sensor → viewer:
//!
//! ```json
//! {"type":"sensor_data","field_strength":42.3,"current_direction":"Northeast","field_direction":[0.2,0.9,0.3]}
//! ```
//!
//! Viewer → sensor:
//!
//! ```json
//! {"command":"LED_ON"}
//! ```

use serde::{Deserialize, Serialize};

use crate::enums::{CommandKind, CompassDirection, ParseCommandError};

/// One magnetometer reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Total field magnitude in microtesla.
    pub field_strength: f64,
    /// Compass direction of the horizontal component.
    pub current_direction: CompassDirection,
    /// Unit vector of the field.
    pub field_direction: [f64; 3],
}

impl SensorReading {
    /// Build a reading from raw axis values in microtesla.
    ///
    /// Returns `None` for a zero or non-finite vector, which has no
    /// direction to report.
    pub fn from_vector(x: f64, y: f64, z: f64) -> Option<Self> {
        let strength = (x.mul_add(x, y.mul_add(y, z * z))).sqrt();
        if !strength.is_finite() || strength <= f64::EPSILON {
            return None;
        }
        Some(Self {
            field_strength: strength,
            current_direction: CompassDirection::from_components(x, y),
            field_direction: [x / strength, y / strength, z / strength],
        })
    }
}

/// Tagged envelope for everything the sensor publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorMessage {
    /// A periodic field reading.
    SensorData(SensorReading),
}

impl SensorMessage {
    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a JSON text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// A command sent from the viewer to the sensor.
///
/// The command name is kept as a raw string so that unknown commands still
/// decode; the sensor ignores what [`kind`](Self::kind) cannot name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorCommand {
    /// Wire name of the command (e.g. `LED_ON`).
    pub command: String,
}

impl SensorCommand {
    /// Build a command for a known kind.
    pub fn new(kind: CommandKind) -> Self {
        Self {
            command: kind.as_str().to_owned(),
        }
    }

    /// Resolve the command name.
    pub fn kind(&self) -> Result<CommandKind, ParseCommandError> {
        self.command.parse()
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a JSON text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sensor_data_wire_shape() {
        let msg = SensorMessage::parse(
            r#"{"type":"sensor_data","field_strength":42.3,"current_direction":"Northeast","field_direction":[0.2,0.9,0.3]}"#,
        )
        .unwrap();
        let SensorMessage::SensorData(reading) = msg;
        assert!((reading.field_strength - 42.3).abs() < 1e-9);
        assert_eq!(reading.current_direction, CompassDirection::Northeast);

        let json: serde_json::Value =
            serde_json::from_str(&SensorMessage::SensorData(reading).to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "sensor_data");
        assert_eq!(json["current_direction"], "Northeast");
        assert_eq!(json["field_direction"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn reading_from_vector_normalizes() {
        let reading = SensorReading::from_vector(3.0, 0.0, 4.0).unwrap();
        assert!((reading.field_strength - 5.0).abs() < 1e-12);
        assert!((reading.field_direction[0] - 0.6).abs() < 1e-12);
        assert!((reading.field_direction[2] - 0.8).abs() < 1e-12);
        assert_eq!(reading.current_direction, CompassDirection::North);
    }

    #[test]
    fn zero_vector_has_no_reading() {
        assert!(SensorReading::from_vector(0.0, 0.0, 0.0).is_none());
        assert!(SensorReading::from_vector(f64::NAN, 1.0, 0.0).is_none());
    }

    #[test]
    fn unknown_command_still_decodes() {
        let cmd = SensorCommand::parse(r#"{"command":"WARP_DRIVE"}"#).unwrap();
        assert!(cmd.kind().is_err());

        let cmd = SensorCommand::parse(&SensorCommand::new(CommandKind::LedOff).to_json().unwrap())
            .unwrap();
        assert_eq!(cmd.kind(), Ok(CommandKind::LedOff));
    }
}
