//! Simulated three-axis magnetometer.
//!
//! The field vector wanders around a mid-latitude baseline: each step adds
//! uniform noise per axis and pulls the vector a fraction of the way back,
//! so readings drift without running away. A storm step adds a larger
//! excursion on top.

use geostorm_types::SensorReading;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Quiet-day field in µT, magnitude about 46 µT.
pub const BASELINE: [f64; 3] = [18.0, 32.0, -28.0];

/// Largest per-axis change of one step, in µT.
const STEP_UT: f64 = 1.5;

/// Fraction of the offset from baseline removed each step.
const PULL: f64 = 0.08;

/// Chance per step that a disturbance starts.
const STORM_CHANCE: f64 = 0.02;

/// Per-axis kick of a disturbance, in µT.
const STORM_KICK_UT: f64 = 12.0;

/// A seeded random-walk magnetometer.
#[derive(Debug)]
pub struct Magnetometer {
    rng: StdRng,
    field: [f64; 3],
}

impl Magnetometer {
    /// Start at [`BASELINE`] with a deterministic noise source.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            field: BASELINE,
        }
    }

    /// Current raw field vector in µT.
    pub const fn field(&self) -> [f64; 3] {
        self.field
    }

    /// Advance the walk by one step.
    pub fn step(&mut self) {
        let storm = self.rng.random_bool(STORM_CHANCE);
        for (value, base) in self.field.iter_mut().zip(BASELINE) {
            let mut delta = self.rng.random_range(-STEP_UT..=STEP_UT);
            if storm {
                delta += STORM_KICK_UT * self.rng.random_range(0.5..=1.0);
            }
            *value += delta - (*value - base) * PULL;
        }
    }

    /// Advance one step and report the new field.
    pub fn read(&mut self) -> Option<SensorReading> {
        self.step();
        let [x, y, z] = self.field;
        SensorReading::from_vector(x, y, z)
    }

    /// Snap back to the baseline.
    pub const fn calibrate(&mut self) {
        self.field = BASELINE;
    }
}
