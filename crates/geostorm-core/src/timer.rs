//! Deterministic timers driven by a caller-supplied clock.
//!
//! Nothing here sleeps or spawns. Callers pass the current time (as a
//! [`Duration`] since some fixed origin) and the timers report what has
//! become due since the last poll. This keeps every effect sequence on the
//! single thread that owns the scene and makes timing fully testable.
//!
//! - [`Interval`] -- a repeating timer; reports how many periods elapsed.
//! - [`Timeline`] -- a fixed list of `(offset, action)` stages measured
//!   from one activation instant, cancellable as a whole.

use std::time::Duration;

/// A repeating timer anchored at a start instant.
///
/// The first firing is one `period` after the start. Polling with
/// [`due`](Self::due) returns every firing that has elapsed since the last
/// poll, so a late poll catches up instead of dropping steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next_due: Duration,
}

impl Interval {
    /// Create an interval whose first firing is at `start + period`.
    ///
    /// A zero period fires once per poll.
    pub fn new(start: Duration, period: Duration) -> Self {
        Self {
            period,
            next_due: start.saturating_add(period),
        }
    }

    /// Instant of the next firing.
    pub const fn next_due(&self) -> Duration {
        self.next_due
    }

    /// Number of firings due at `now`, advancing the schedule past them.
    pub fn due(&mut self, now: Duration) -> u32 {
        if now < self.next_due {
            return 0;
        }
        if self.period.is_zero() {
            self.next_due = now;
            return 1;
        }
        let late = now.saturating_sub(self.next_due).as_nanos();
        let periods = late
            .checked_div(self.period.as_nanos())
            .unwrap_or(0)
            .saturating_add(1);
        let fired = u32::try_from(periods).unwrap_or(u32::MAX);
        let advance = self.period.checked_mul(fired).unwrap_or(Duration::MAX);
        self.next_due = self.next_due.saturating_add(advance);
        fired
    }
}

/// One stage of a [`Timeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step<A> {
    /// Offset from activation at which the stage fires.
    offset: Duration,
    /// The stage payload handed back by [`Timeline::poll`].
    action: A,
}

/// A scripted sequence of stages at fixed offsets from one activation.
///
/// A timeline is either idle or running. While running it hands back each
/// stage exactly once, in offset order, as the clock passes it. After the
/// last stage fires it returns to idle on its own; [`cancel`](Self::cancel)
/// returns it to idle early and discards the remaining stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline<A> {
    steps: Vec<Step<A>>,
    started_at: Option<Duration>,
    cursor: usize,
}

impl<A: Copy> Timeline<A> {
    /// Build a timeline from `(offset, action)` pairs. Stages are sorted by
    /// offset; equal offsets keep their given order.
    pub fn new<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = (Duration, A)>,
    {
        let mut steps: Vec<Step<A>> = steps
            .into_iter()
            .map(|(offset, action)| Step { offset, action })
            .collect();
        steps.sort_by_key(|step| step.offset);
        Self {
            steps,
            started_at: None,
            cursor: 0,
        }
    }

    /// Begin the sequence at `now`. Returns `false` (and changes nothing)
    /// when the timeline is already running.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        self.cursor = 0;
        true
    }

    /// Return every stage that has become due at `now`, in order.
    pub fn poll(&mut self, now: Duration) -> Vec<A> {
        let Some(started_at) = self.started_at else {
            return Vec::new();
        };
        let elapsed = now.saturating_sub(started_at);
        let mut fired = Vec::new();
        while let Some(step) = self.steps.get(self.cursor) {
            if step.offset > elapsed {
                break;
            }
            fired.push(step.action);
            self.cursor = self.cursor.saturating_add(1);
        }
        if self.cursor >= self.steps.len() {
            self.started_at = None;
            self.cursor = 0;
        }
        fired
    }

    /// Abort the running sequence. Returns whether anything was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.started_at.is_some();
        self.started_at = None;
        self.cursor = 0;
        was_running
    }

    /// Whether the sequence has been started and not yet finished.
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// The next stage that will fire, if running.
    pub fn next_stage(&self) -> Option<A> {
        self.started_at?;
        self.steps.get(self.cursor).map(|step| step.action)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn interval_first_fires_after_one_period() {
        let mut interval = Interval::new(ms(100), ms(40));
        assert_eq!(interval.due(ms(139)), 0);
        assert_eq!(interval.due(ms(140)), 1);
        assert_eq!(interval.due(ms(140)), 0);
        assert_eq!(interval.next_due(), ms(180));
    }

    #[test]
    fn interval_catches_up_after_a_late_poll() {
        let mut interval = Interval::new(Duration::ZERO, ms(16));
        assert_eq!(interval.due(ms(50)), 3);
        assert_eq!(interval.next_due(), ms(64));
        assert_eq!(interval.due(ms(63)), 0);
        assert_eq!(interval.due(ms(64)), 1);
    }

    #[test]
    fn zero_period_fires_once_per_poll() {
        let mut interval = Interval::new(ms(5), Duration::ZERO);
        assert_eq!(interval.due(ms(4)), 0);
        assert_eq!(interval.due(ms(5)), 1);
        assert_eq!(interval.due(ms(500)), 1);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Stage {
        A,
        B,
        C,
    }

    fn timeline() -> Timeline<Stage> {
        Timeline::new([(ms(900), Stage::C), (ms(0), Stage::A), (ms(600), Stage::B)])
    }

    #[test]
    fn stages_fire_in_offset_order_once() {
        let mut t = timeline();
        assert!(t.start(ms(1000)));
        assert_eq!(t.poll(ms(1000)), vec![Stage::A]);
        assert_eq!(t.poll(ms(1000)), Vec::<Stage>::new());
        assert_eq!(t.next_stage(), Some(Stage::B));
        assert_eq!(t.poll(ms(2000)), vec![Stage::B, Stage::C]);
        assert!(!t.is_running());
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut t = timeline();
        assert!(t.start(ms(0)));
        assert!(!t.start(ms(10)));
        assert_eq!(t.poll(ms(10)), vec![Stage::A]);
    }

    #[test]
    fn cancel_discards_remaining_stages() {
        let mut t = timeline();
        t.start(ms(0));
        assert_eq!(t.poll(ms(700)), vec![Stage::A, Stage::B]);
        assert!(t.cancel());
        assert!(!t.is_running());
        assert!(t.poll(ms(5000)).is_empty());
        assert!(!t.cancel());
    }

    #[test]
    fn restart_after_completion_replays_all_stages() {
        let mut t = timeline();
        t.start(ms(0));
        t.poll(ms(900));
        assert!(t.start(ms(2000)));
        assert_eq!(t.poll(ms(2000)), vec![Stage::A]);
    }

    #[test]
    fn idle_timeline_polls_empty() {
        let mut t = timeline();
        assert!(t.poll(ms(10_000)).is_empty());
        assert_eq!(t.next_stage(), None);
    }
}
