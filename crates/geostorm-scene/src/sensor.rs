//! Synthetic magnetic samples for when no sensor is attached.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{SYNTHETIC_MIN, SYNTHETIC_SPAN};

/// Uniform random field strengths in `[25, 65)` µT.
#[derive(Debug, Clone)]
pub struct SyntheticSensor {
    rng: StdRng,
}

impl SyntheticSensor {
    /// A reproducible source seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next sample.
    pub fn sample(&mut self) -> f64 {
        SYNTHETIC_MIN + self.rng.random::<f64>() * SYNTHETIC_SPAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_range() {
        let mut sensor = SyntheticSensor::new(7);
        for _ in 0..1000 {
            let v = sensor.sample();
            assert!((25.0..65.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SyntheticSensor::new(42);
        let mut b = SyntheticSensor::new(42);
        for _ in 0..10 {
            assert!((a.sample() - b.sample()).abs() < f64::EPSILON);
        }
    }
}
