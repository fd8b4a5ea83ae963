//! Sleep timer state
//!
//! Pure state; the controller owns scheduling. Every enable/disable bumps the
//! generation so an already-scheduled fire can be recognised as stale.

use crate::config::SleepTimerBounds;
use crate::error::{PlaybackError, Result};
use crate::types::SleepTimerSnapshot;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct SleepTimer {
    enabled: bool,
    duration_minutes: u32,
    /// Set only while a session is playing
    deadline: Option<Instant>,
    generation: u64,
}

impl SleepTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable with a new duration; the timer is pending until armed
    pub fn enable(&mut self, minutes: u32, bounds: &SleepTimerBounds) -> Result<()> {
        if !bounds.accepts(minutes) {
            return Err(PlaybackError::InvalidSleepDuration(minutes));
        }
        self.enabled = true;
        self.duration_minutes = minutes;
        self.deadline = None;
        self.generation += 1;
        Ok(())
    }

    /// Start counting down from `now`; returns the deadline and its generation
    pub fn arm(&mut self, now: Instant) -> Option<(Instant, u64)> {
        if !self.enabled {
            return None;
        }
        let deadline = now + self.duration();
        self.deadline = Some(deadline);
        Some((deadline, self.generation))
    }

    /// Disable; returns whether it was enabled
    pub fn disable(&mut self) -> bool {
        let was_enabled = self.enabled;
        self.enabled = false;
        self.deadline = None;
        self.generation += 1;
        was_enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enabled but not yet counting down
    pub fn is_pending(&self) -> bool {
        self.enabled && self.deadline.is_none()
    }

    /// Whether a fire for `generation` is still current
    pub fn is_current(&self, generation: u64) -> bool {
        self.enabled && self.deadline.is_some() && self.generation == generation
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_minutes) * 60)
    }

    /// Whole minutes left, rounded up
    pub fn remaining_minutes(&self, now: Instant) -> Option<u32> {
        let deadline = self.deadline?;
        let secs = deadline.saturating_duration_since(now).as_secs_f64();
        Some((secs / 60.0).ceil() as u32)
    }

    pub fn snapshot(&self, now: Instant) -> SleepTimerSnapshot {
        if !self.enabled {
            return SleepTimerSnapshot::default();
        }
        SleepTimerSnapshot {
            enabled: true,
            duration_minutes: Some(self.duration_minutes),
            remaining_minutes: self.remaining_minutes(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_then_arm() {
        let mut timer = SleepTimer::new();
        timer.enable(30, &SleepTimerBounds::default()).unwrap();
        assert!(timer.is_pending());

        let now = Instant::now();
        let (deadline, generation) = timer.arm(now).unwrap();
        assert_eq!(deadline, now + Duration::from_secs(30 * 60));
        assert!(timer.is_current(generation));
        assert!(!timer.is_pending());
    }

    #[test]
    fn invalid_duration_leaves_timer_untouched() {
        let mut timer = SleepTimer::new();
        let err = timer.enable(7, &SleepTimerBounds::default()).unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidSleepDuration(7)));
        assert!(!timer.is_enabled());
    }

    #[test]
    fn disable_makes_fires_stale() {
        let mut timer = SleepTimer::new();
        timer.enable(5, &SleepTimerBounds::default()).unwrap();
        let (_, generation) = timer.arm(Instant::now()).unwrap();

        assert!(timer.disable());
        assert!(!timer.is_current(generation));
        assert!(!timer.disable());
    }

    #[test]
    fn re_enable_makes_old_fire_stale() {
        let mut timer = SleepTimer::new();
        let bounds = SleepTimerBounds::default();
        timer.enable(5, &bounds).unwrap();
        let (_, old) = timer.arm(Instant::now()).unwrap();

        timer.enable(10, &bounds).unwrap();
        let (_, new) = timer.arm(Instant::now()).unwrap();
        assert!(!timer.is_current(old));
        assert!(timer.is_current(new));
    }

    #[test]
    fn remaining_minutes_rounds_up() {
        let mut timer = SleepTimer::new();
        timer.enable(30, &SleepTimerBounds::default()).unwrap();
        let start = Instant::now();
        timer.arm(start);

        assert_eq!(timer.remaining_minutes(start), Some(30));
        assert_eq!(
            timer.remaining_minutes(start + Duration::from_secs(61)),
            Some(29)
        );
        assert_eq!(
            timer.remaining_minutes(start + Duration::from_secs(30 * 60 - 1)),
            Some(1)
        );
        assert_eq!(
            timer.remaining_minutes(start + Duration::from_secs(31 * 60)),
            Some(0)
        );
    }

    #[test]
    fn arm_when_disabled_is_noop() {
        let mut timer = SleepTimer::new();
        assert!(timer.arm(Instant::now()).is_none());
        assert_eq!(timer.snapshot(Instant::now()), SleepTimerSnapshot::default());
    }
}
