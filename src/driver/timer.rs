use super::LOG_TARGET;
use core::time::Duration;
use strum::Display;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// The timers the driver can have running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TimerKind {
    /// Repeating, drives the fill phase
    Fill,

    /// Repeating, drives the drain phase
    Drain,

    /// Fires once at the end of the repair delay
    Repair,
}

/// Slot for the one timer the driver is allowed to have running.
///
/// Arming a timer always cancels whatever was in the slot first, so two phases can
/// never tick at the same time.
#[derive(Debug, Default)]
pub struct ActiveTimer {
    current: Option<(TimerKind, Interval)>,
    armed: u64,
}

impl ActiveTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None, armed: 0 }
    }

    /// Replace the running timer with a new one whose first tick lands one `period` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, kind: TimerKind, period: Duration) {
        let _ = self.cancel();

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.current = Some((kind, interval));
        self.armed += 1;

        log::debug!(target: LOG_TARGET, "Armed {kind} timer every {}ms", period.as_millis());
    }

    /// Stop the running timer, returning which one it was.
    pub fn cancel(&mut self) -> Option<TimerKind> {
        let (kind, _) = self.current.take()?;
        log::debug!(target: LOG_TARGET, "Cancelled {kind} timer");
        Some(kind)
    }

    /// The timer currently in the slot.
    #[must_use]
    pub fn kind(&self) -> Option<TimerKind> {
        self.current.as_ref().map(|(kind, _)| *kind)
    }

    /// How many timers have been armed over the slot's lifetime.
    #[must_use]
    pub const fn armed_count(&self) -> u64 {
        self.armed
    }

    /// Wait for the next tick. Never completes while the slot is empty.
    pub async fn tick(&mut self) -> TimerKind {
        match &mut self.current {
            Some((kind, interval)) => {
                let _ = interval.tick().await;
                *kind
            }
            None => core::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_arming_replaces_previous_timer() {
        let mut timer = ActiveTimer::new();
        assert_eq!(timer.kind(), None);

        timer.arm(TimerKind::Fill, Duration::from_millis(30));
        timer.arm(TimerKind::Drain, Duration::from_millis(40));

        assert_eq!(timer.kind(), Some(TimerKind::Drain));
        assert_eq!(timer.armed_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_period() {
        let mut timer = ActiveTimer::new();
        let start = Instant::now();
        timer.arm(TimerKind::Drain, Duration::from_millis(40));

        assert_eq!(timer.tick().await, TimerKind::Drain);
        assert_eq!(start.elapsed(), Duration::from_millis(40));

        let _ = timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(80));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_empties_slot() {
        let mut timer = ActiveTimer::new();
        timer.arm(TimerKind::Repair, Duration::from_secs(2));

        assert_eq!(timer.cancel(), Some(TimerKind::Repair));
        assert_eq!(timer.cancel(), None);
        assert_eq!(timer.kind(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_slot_never_ticks() {
        let mut timer = ActiveTimer::new();
        let result = tokio::time::timeout(Duration::from_secs(60), timer.tick()).await;
        assert!(result.is_err());
    }
}
