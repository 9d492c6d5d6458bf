//! Enumeration types shared by the relay, sensor, and viewer.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// The role a relay connection is classified into.
///
/// The relay pairs exactly one sensor with exactly one viewer. Messages
/// from one role are forwarded to the current holder of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientRole {
    /// The embedded magnetometer (or its simulator).
    Sensor,
    /// The browser rendering the Earth scene.
    Viewer,
}

impl ClientRole {
    /// Classify a connection from its declared `User-Agent`.
    ///
    /// A connection is a viewer when the header contains `viewer_marker`
    /// (browsers all announce `Mozilla`); anything else, including a
    /// missing header, is a sensor.
    pub fn classify(user_agent: Option<&str>, viewer_marker: &str) -> Self {
        match user_agent {
            Some(ua) if ua.contains(viewer_marker) => Self::Viewer,
            _ => Self::Sensor,
        }
    }

    /// The role messages from this role are forwarded to.
    pub const fn peer(self) -> Self {
        match self {
            Self::Sensor => Self::Viewer,
            Self::Viewer => Self::Sensor,
        }
    }

    /// Lowercase name used in logs and the status endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for ClientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Eight-point compass direction of the horizontal field component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    /// 337.5° to 22.5°.
    North,
    /// 22.5° to 67.5°.
    Northeast,
    /// 67.5° to 112.5°.
    East,
    /// 112.5° to 157.5°.
    Southeast,
    /// 157.5° to 202.5°.
    South,
    /// 202.5° to 247.5°.
    Southwest,
    /// 247.5° to 292.5°.
    West,
    /// 292.5° to 337.5°.
    Northwest,
}

impl CompassDirection {
    /// Map a heading in degrees (any range) to its 45° sector.
    pub fn from_heading_degrees(heading: f64) -> Self {
        let heading = heading.rem_euclid(360.0);
        if !(22.5..337.5).contains(&heading) {
            Self::North
        } else if heading < 67.5 {
            Self::Northeast
        } else if heading < 112.5 {
            Self::East
        } else if heading < 157.5 {
            Self::Southeast
        } else if heading < 202.5 {
            Self::South
        } else if heading < 247.5 {
            Self::Southwest
        } else if heading < 292.5 {
            Self::West
        } else {
            Self::Northwest
        }
    }

    /// Heading of the horizontal `(x, y)` field vector, measured from +x.
    pub fn from_components(x: f64, y: f64) -> Self {
        Self::from_heading_degrees(y.atan2(x).to_degrees())
    }

    /// Human-readable label, identical to the serialized form.
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::Northeast => "Northeast",
            Self::East => "East",
            Self::Southeast => "Southeast",
            Self::South => "South",
            Self::Southwest => "Southwest",
            Self::West => "West",
            Self::Northwest => "Northwest",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Commands the viewer can send to the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    /// Switch the status LED on.
    LedOn,
    /// Switch the status LED off.
    LedOff,
    /// Restart the sensor.
    Reset,
    /// Recalibrate the magnetometer.
    Calibrate,
}

impl CommandKind {
    /// Wire name of the command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LedOn => "LED_ON",
            Self::LedOff => "LED_OFF",
            Self::Reset => "RESET",
            Self::Calibrate => "CALIBRATE",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command name that the sensor does not understand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sensor command: {0}")]
pub struct ParseCommandError(pub String);

impl FromStr for CommandKind {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LED_ON" => Ok(Self::LedOn),
            "LED_OFF" => Ok(Self::LedOff),
            "RESET" => Ok(Self::Reset),
            "CALIBRATE" => Ok(Self::Calibrate),
            other => Err(ParseCommandError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_user_agent_is_viewer() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0";
        assert_eq!(ClientRole::classify(Some(ua), "Mozilla"), ClientRole::Viewer);
    }

    #[test]
    fn missing_or_foreign_user_agent_is_sensor() {
        assert_eq!(ClientRole::classify(None, "Mozilla"), ClientRole::Sensor);
        assert_eq!(
            ClientRole::classify(Some("arduino-WebSocket-Client"), "Mozilla"),
            ClientRole::Sensor
        );
    }

    #[test]
    fn roles_are_each_others_peer() {
        assert_eq!(ClientRole::Sensor.peer(), ClientRole::Viewer);
        assert_eq!(ClientRole::Viewer.peer(), ClientRole::Sensor);
    }

    #[test]
    fn compass_sectors() {
        assert_eq!(CompassDirection::from_heading_degrees(0.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_heading_degrees(350.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_heading_degrees(22.5), CompassDirection::Northeast);
        assert_eq!(CompassDirection::from_heading_degrees(90.0), CompassDirection::East);
        assert_eq!(CompassDirection::from_heading_degrees(180.0), CompassDirection::South);
        assert_eq!(CompassDirection::from_heading_degrees(300.0), CompassDirection::Northwest);
        assert_eq!(CompassDirection::from_heading_degrees(-90.0), CompassDirection::West);
    }

    #[test]
    fn compass_from_components() {
        assert_eq!(CompassDirection::from_components(1.0, 0.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_components(1.0, 1.0), CompassDirection::Northeast);
        assert_eq!(CompassDirection::from_components(0.0, -1.0), CompassDirection::West);
    }

    #[test]
    fn command_names_round_trip_through_from_str() {
        for kind in [
            CommandKind::LedOn,
            CommandKind::LedOff,
            CommandKind::Reset,
            CommandKind::Calibrate,
        ] {
            assert_eq!(kind.as_str().parse::<CommandKind>(), Ok(kind));
        }
        assert!("SELF_DESTRUCT".parse::<CommandKind>().is_err());
    }
}
