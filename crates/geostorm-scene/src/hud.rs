//! Page overlay state: readouts, the alert overlay, and view modes.
//!
//! The scene never touches a DOM. It keeps the text of each readout and a
//! few flags keyed by the element ids the page uses, and a front end
//! mirrors them.

use std::collections::BTreeMap;

use geostorm_types::SensorReading;
use glam::DVec3;

/// Element ids of the page.
pub mod ids {
    /// Field strength readout.
    pub const B_STRENGTH: &str = "b_strength";
    /// Current direction readout.
    pub const CURRENT_DIR: &str = "current_dir";
    /// Field direction readout.
    pub const B_DIR: &str = "b_dir";
}

/// Text shown in the current-direction readout before any reading.
pub const DEFAULT_CURRENT_DIRECTION: &str = "Flows around Earth's axis (West → East)";

/// Field direction shown before any reading, normalized on display.
pub const DEFAULT_FIELD_DIRECTION: [f64; 3] = [0.2, 1.0, 0.0];

/// Format a field strength the way the readout shows it.
pub fn format_strength(micro_tesla: f64) -> String {
    format!("{micro_tesla:.2} µT")
}

/// Format a direction vector the way the readout shows it.
pub fn format_vector([x, y, z]: [f64; 3]) -> String {
    format!("({x:.2}, {y:.2}, {z:.2})")
}

/// Overlay state mirrored by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    readouts: BTreeMap<&'static str, String>,
    overlay_active: bool,
    sun_wave_disabled: bool,
    theory_mode: bool,
    live_mode: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    /// Initial state with the default direction readouts.
    pub fn new() -> Self {
        let direction = DVec3::from_array(DEFAULT_FIELD_DIRECTION).normalize_or_zero();
        let mut readouts = BTreeMap::new();
        readouts.insert(ids::CURRENT_DIR, DEFAULT_CURRENT_DIRECTION.to_owned());
        readouts.insert(ids::B_DIR, format_vector(direction.to_array()));
        Self {
            readouts,
            overlay_active: false,
            sun_wave_disabled: false,
            theory_mode: false,
            live_mode: false,
        }
    }

    /// Text of a readout, if it has been set.
    pub fn readout(&self, id: &str) -> Option<&str> {
        self.readouts.get(id).map(String::as_str)
    }

    /// All readouts by element id.
    pub const fn readouts(&self) -> &BTreeMap<&'static str, String> {
        &self.readouts
    }

    /// Show a field strength.
    pub fn show_strength(&mut self, micro_tesla: f64) {
        self.readouts
            .insert(ids::B_STRENGTH, format_strength(micro_tesla));
    }

    /// Show every field of a sensor reading.
    pub fn show_reading(&mut self, reading: &SensorReading) {
        self.show_strength(reading.field_strength);
        self.readouts.insert(
            ids::CURRENT_DIR,
            reading.current_direction.label().to_owned(),
        );
        self.readouts
            .insert(ids::B_DIR, format_vector(reading.field_direction));
    }

    /// Show or hide the emergency overlay.
    pub const fn set_alert(&mut self, active: bool) {
        self.overlay_active = active;
    }

    /// Whether the emergency overlay is showing.
    pub const fn alert_active(&self) -> bool {
        self.overlay_active
    }

    /// Grey out or restore the sun-wave button.
    pub const fn set_sun_wave_disabled(&mut self, disabled: bool) {
        self.sun_wave_disabled = disabled;
    }

    /// Whether the sun-wave button is greyed out.
    pub const fn sun_wave_disabled(&self) -> bool {
        self.sun_wave_disabled
    }

    /// Theory button.
    pub const fn enter_theory(&mut self) {
        self.theory_mode = true;
    }

    /// Back button.
    pub const fn leave_theory(&mut self) {
        self.theory_mode = false;
    }

    /// Whether the theory view is showing.
    pub const fn theory_mode(&self) -> bool {
        self.theory_mode
    }

    /// Enter or leave the live view. Entering also leaves theory mode.
    pub const fn set_live_mode(&mut self, live: bool) {
        self.live_mode = live;
        if live {
            self.theory_mode = false;
        }
    }

    /// Whether the live view is showing.
    pub const fn live_mode(&self) -> bool {
        self.live_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostorm_types::CompassDirection;

    #[test]
    fn initial_readouts() {
        let hud = Hud::new();
        assert_eq!(hud.readout(ids::B_DIR), Some("(0.20, 0.98, 0.00)"));
        assert_eq!(
            hud.readout(ids::CURRENT_DIR),
            Some(DEFAULT_CURRENT_DIRECTION)
        );
        assert_eq!(hud.readout(ids::B_STRENGTH), None);
        assert!(!hud.alert_active());
        assert!(!hud.sun_wave_disabled());
    }

    #[test]
    fn reading_updates_all_three_readouts() {
        let mut hud = Hud::new();
        hud.show_reading(&SensorReading {
            field_strength: 48.2,
            current_direction: CompassDirection::Northeast,
            field_direction: [0.5, -0.25, 0.126],
        });
        assert_eq!(hud.readout(ids::B_STRENGTH), Some("48.20 µT"));
        assert_eq!(hud.readout(ids::CURRENT_DIR), Some("Northeast"));
        assert_eq!(hud.readout(ids::B_DIR), Some("(0.50, -0.25, 0.13)"));
    }

    #[test]
    fn live_mode_clears_theory_mode() {
        let mut hud = Hud::new();
        hud.enter_theory();
        assert!(hud.theory_mode());
        hud.set_live_mode(true);
        assert!(hud.live_mode());
        assert!(!hud.theory_mode());
        hud.enter_theory();
        hud.set_live_mode(false);
        assert!(hud.theory_mode());
        hud.leave_theory();
        assert!(!hud.theory_mode());
    }
}
