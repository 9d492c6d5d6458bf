//! Timed visual effects.
//!
//! Each effect is a small state machine owned by the scene and polled with
//! the frame clock. No effect holds a timer of its own; repeating steps
//! come from [`Interval`](geostorm_core::Interval) and multi-stage
//! sequences from [`Timeline`](geostorm_core::Timeline).

pub mod aurora;
pub mod beam;
pub mod sun_wave;

pub use aurora::Aurora;
pub use beam::{BeamGeometry, SolarBeam};
pub use sun_wave::{SunWave, SunWaveStage};

/// Coarse lifecycle shared by every effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectPhase {
    /// Nothing showing; a trigger will start the effect.
    Idle,
    /// Started and building up or holding.
    Running,
    /// Winding down; returns to idle on its own.
    Cooling,
}
