//! Aurora fade controller.
//!
//! The aurora shell is always in the scene; this controller only drives
//! its intensity uniform. One activation fades in, holds until the
//! requested duration has passed since the trigger, then fades out. A
//! trigger during an activation is ignored.

use std::time::Duration;

use geostorm_core::Interval;
use tracing::debug;

use crate::constants::{AURORA_STEP, AURORA_TICK};
use crate::effects::EffectPhase;

#[derive(Debug, Clone, Copy, PartialEq)]
enum AuroraState {
    Idle,
    Running {
        /// `None` once intensity has reached 1.
        fade_in: Option<Interval>,
        fade_out_at: Duration,
    },
    Cooling(Interval),
}

/// Intensity state machine for the aurora shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Aurora {
    intensity: f32,
    state: AuroraState,
}

impl Default for Aurora {
    fn default() -> Self {
        Self::new()
    }
}

impl Aurora {
    /// An invisible, idle aurora.
    pub const fn new() -> Self {
        Self {
            intensity: 0.0,
            state: AuroraState::Idle,
        }
    }

    /// Current intensity in `[0, 1]`.
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Whether an activation is in progress (the latch).
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, AuroraState::Idle)
    }

    /// Lifecycle phase.
    pub const fn phase(&self) -> EffectPhase {
        match self.state {
            AuroraState::Idle => EffectPhase::Idle,
            AuroraState::Running { .. } => EffectPhase::Running,
            AuroraState::Cooling(_) => EffectPhase::Cooling,
        }
    }

    /// Start an activation that holds for `duration` after `now`.
    ///
    /// Returns `false` without changing anything if one is already in
    /// progress.
    pub fn trigger(&mut self, now: Duration, duration: Duration) -> bool {
        if self.is_active() {
            debug!("Aurora already active, trigger ignored");
            return false;
        }
        self.intensity = 0.0;
        self.state = AuroraState::Running {
            fade_in: Some(Interval::new(now, AURORA_TICK)),
            fade_out_at: now.saturating_add(duration),
        };
        debug!(?duration, "Aurora triggered");
        true
    }

    /// Skip the rest of the hold and start fading out at `now`.
    pub fn cancel(&mut self, now: Duration) {
        if matches!(self.state, AuroraState::Running { .. }) {
            self.state = AuroraState::Cooling(Interval::new(now, AURORA_TICK));
        }
    }

    /// Apply every fade step due at `now` and return the intensity.
    pub fn update(&mut self, now: Duration) -> f32 {
        if let AuroraState::Running {
            fade_in,
            fade_out_at,
        } = &mut self.state
        {
            let fade_out_at = *fade_out_at;
            if let Some(interval) = fade_in {
                // Fade-in steps past the hold deadline never happen.
                let steps = interval.due(now.min(fade_out_at));
                for _ in 0..steps {
                    self.intensity = (self.intensity + AURORA_STEP).min(1.0);
                }
                if self.intensity >= 1.0 {
                    *fade_in = None;
                }
            }
            if now >= fade_out_at {
                self.state = AuroraState::Cooling(Interval::new(fade_out_at, AURORA_TICK));
            }
        }

        if let AuroraState::Cooling(interval) = &mut self.state {
            for _ in 0..interval.due(now) {
                self.intensity = (self.intensity - AURORA_STEP).max(0.0);
            }
            if self.intensity <= 0.0 {
                self.intensity = 0.0;
                self.state = AuroraState::Idle;
                debug!("Aurora faded out");
            }
        }
        self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fades_in_holds_and_fades_out() {
        let mut aurora = Aurora::new();
        assert!(aurora.trigger(ms(0), ms(5000)));
        assert_eq!(aurora.phase(), EffectPhase::Running);

        // 25 steps of 0.04 reach full intensity.
        aurora.update(ms(40 * 25));
        assert!((aurora.intensity() - 1.0).abs() < 1e-4);
        aurora.update(ms(4999));
        assert!((aurora.intensity() - 1.0).abs() < 1e-4);

        aurora.update(ms(5000));
        assert_eq!(aurora.phase(), EffectPhase::Cooling);
        aurora.update(ms(5000 + 40 * 26));
        assert_eq!(aurora.phase(), EffectPhase::Idle);
        assert!(aurora.intensity().abs() < f32::EPSILON);
        assert!(!aurora.is_active());
    }

    #[test]
    fn intensity_is_monotone_per_phase_and_bounded() {
        let mut aurora = Aurora::new();
        aurora.trigger(ms(0), ms(600));
        let mut last = aurora.intensity();
        let mut falling = false;
        for t in (0..3000).step_by(7) {
            let value = aurora.update(ms(t));
            assert!((0.0..=1.0).contains(&value));
            if value < last {
                falling = true;
            }
            if falling {
                assert!(value <= last);
                assert_ne!(aurora.phase(), EffectPhase::Running);
            }
            last = value;
        }
        assert!(falling);
        assert_eq!(aurora.phase(), EffectPhase::Idle);
    }

    #[test]
    fn short_hold_fades_out_from_partial_intensity() {
        let mut aurora = Aurora::new();
        aurora.trigger(ms(0), ms(200));
        // 5 fade-in steps land before the deadline, none after it.
        aurora.update(ms(2000));
        assert!(aurora.intensity() <= 0.2 + 1e-4);
        aurora.update(ms(10_000));
        assert!(!aurora.is_active());
    }

    #[test]
    fn trigger_while_active_is_ignored() {
        let mut aurora = Aurora::new();
        assert!(aurora.trigger(ms(0), ms(5000)));
        aurora.update(ms(400));
        let before = aurora.intensity();
        assert!(!aurora.trigger(ms(400), ms(100)));
        assert!((aurora.intensity() - before).abs() < f32::EPSILON);

        // Still in the original hold.
        aurora.update(ms(4000));
        assert_eq!(aurora.phase(), EffectPhase::Running);
    }

    #[test]
    fn retrigger_after_fade_out() {
        let mut aurora = Aurora::new();
        aurora.trigger(ms(0), ms(100));
        aurora.update(ms(5000));
        assert!(aurora.trigger(ms(5000), ms(100)));
    }

    #[test]
    fn cancel_starts_fade_out() {
        let mut aurora = Aurora::new();
        aurora.trigger(ms(0), ms(5000));
        aurora.update(ms(400));
        aurora.cancel(ms(400));
        assert_eq!(aurora.phase(), EffectPhase::Cooling);
        aurora.update(ms(2000));
        assert_eq!(aurora.phase(), EffectPhase::Idle);
    }
}
