//! The scripted storm presentation.
//!
//! A sun wave is a fixed list of stages at offsets from one activation.
//! This type only sequences them; [`EarthScene`](crate::EarthScene) applies
//! each stage to the scene, HUD, and the other effects. The timeline being
//! active is the latch: a trigger while it runs is ignored.

use std::fmt;
use std::time::Duration;

use geostorm_core::Timeline;
use tracing::{debug, info};

use crate::constants::{
    SUN_WAVE_ALERT_AT, SUN_WAVE_AURORA_AT, SUN_WAVE_BEAM_AT, SUN_WAVE_CLEANUP_AT,
};
use crate::effects::EffectPhase;

/// One stage of the sun-wave sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SunWaveStage {
    /// Flare the sun and disable the trigger.
    Charge,
    /// Fire the solar beam at the globe.
    FireBeam,
    /// Raise the emergency overlay.
    RaiseAlert,
    /// Start the aurora for the storm duration.
    Aurora,
    /// Shrink the beam, clear the overlay, re-enable the trigger.
    Cleanup,
}

impl SunWaveStage {
    /// Stable lowercase name, used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Charge => "charge",
            Self::FireBeam => "fire_beam",
            Self::RaiseAlert => "raise_alert",
            Self::Aurora => "aurora",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for SunWaveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequencer for the sun wave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SunWave {
    timeline: Timeline<SunWaveStage>,
}

impl Default for SunWave {
    fn default() -> Self {
        Self::new()
    }
}

impl SunWave {
    /// The standard sequence: charge at once, beam at 600 ms, alert at
    /// 900 ms, aurora at 1400 ms, cleanup at 4200 ms.
    pub fn new() -> Self {
        Self::with_offsets([
            (Duration::ZERO, SunWaveStage::Charge),
            (SUN_WAVE_BEAM_AT, SunWaveStage::FireBeam),
            (SUN_WAVE_ALERT_AT, SunWaveStage::RaiseAlert),
            (SUN_WAVE_AURORA_AT, SunWaveStage::Aurora),
            (SUN_WAVE_CLEANUP_AT, SunWaveStage::Cleanup),
        ])
    }

    /// A sequence with custom stage offsets.
    pub fn with_offsets<I>(stages: I) -> Self
    where
        I: IntoIterator<Item = (Duration, SunWaveStage)>,
    {
        Self {
            timeline: Timeline::new(stages),
        }
    }

    /// Activate at `now`. Returns `false` if a sequence is already running.
    pub fn trigger(&mut self, now: Duration) -> bool {
        let started = self.timeline.start(now);
        if started {
            info!("Sun wave triggered");
        } else {
            debug!("Sun wave locked, trigger ignored");
        }
        started
    }

    /// Stages that have come due at `now`, in order. The latch releases
    /// once the last stage is returned.
    pub fn poll(&mut self, now: Duration) -> Vec<SunWaveStage> {
        self.timeline.poll(now)
    }

    /// Drop the remaining stages. Returns whether a sequence was running;
    /// the caller is responsible for undoing any stages already applied.
    pub fn cancel(&mut self) -> bool {
        self.timeline.cancel()
    }

    /// Whether a sequence is in progress.
    pub const fn is_locked(&self) -> bool {
        self.timeline.is_running()
    }

    /// Lifecycle phase. The sequence has no wind-down of its own.
    pub const fn phase(&self) -> EffectPhase {
        if self.is_locked() {
            EffectPhase::Running
        } else {
            EffectPhase::Idle
        }
    }

    /// Stage that fires next, if running.
    pub fn next_stage(&self) -> Option<SunWaveStage> {
        self.timeline.next_stage()
    }
}
