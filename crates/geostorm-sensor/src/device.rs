//! Sensor-side command handling.

use geostorm_types::{CommandKind, SensorCommand, SensorMessage};
use tracing::{debug, info, warn};

use crate::magnetometer::Magnetometer;

/// What the connection loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Keep the session running.
    Continue,
    /// Drop the connection and reconnect, as the board does after a
    /// restart.
    Restart,
}

/// The simulated board: a magnetometer and a status LED.
#[derive(Debug)]
pub struct Device {
    magnetometer: Magnetometer,
    seed: u64,
    led_on: bool,
}

impl Device {
    /// A board with its LED off.
    pub fn new(seed: u64) -> Self {
        Self {
            magnetometer: Magnetometer::new(seed),
            seed,
            led_on: false,
        }
    }

    /// Whether the status LED is lit.
    pub const fn led_on(&self) -> bool {
        self.led_on
    }

    /// Take a reading and encode it as a `sensor_data` frame.
    pub fn next_frame(&mut self) -> Option<String> {
        let reading = self.magnetometer.read()?;
        debug!(
            field_strength = reading.field_strength,
            direction = %reading.current_direction,
            "Reading"
        );
        match SensorMessage::SensorData(reading).to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(error = %e, "Failed to encode reading");
                None
            }
        }
    }

    /// Handle a text frame from the viewer. Malformed frames and unknown
    /// commands are ignored.
    pub fn handle_text(&mut self, text: &str) -> Disposition {
        let command = match SensorCommand::parse(text) {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, "Ignoring non-command frame");
                return Disposition::Continue;
            }
        };
        match command.kind() {
            Ok(kind) => self.apply(kind),
            Err(e) => {
                debug!(error = %e, "Ignoring command");
                Disposition::Continue
            }
        }
    }

    /// Carry out a known command.
    pub fn apply(&mut self, kind: CommandKind) -> Disposition {
        let disposition = match kind {
            CommandKind::LedOn => {
                self.led_on = true;
                Disposition::Continue
            }
            CommandKind::LedOff => {
                self.led_on = false;
                Disposition::Continue
            }
            CommandKind::Calibrate => {
                self.magnetometer.calibrate();
                Disposition::Continue
            }
            CommandKind::Reset => {
                self.led_on = false;
                self.magnetometer = Magnetometer::new(self.seed);
                Disposition::Restart
            }
        };
        let [x, y, z] = self.magnetometer.field();
        info!(command = %kind, led_on = self.led_on(), x, y, z, "Command applied");
        disposition
    }
}
