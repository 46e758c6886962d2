use std::time::Duration;

/// A repeating timer owned by the playback controller.
///
/// The host decides what a tick does; the controller only starts and
/// cancels. At most one interval is active per timer.
pub trait IntervalTimer {
    fn start(&mut self, period: Duration);
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// Timer without a clock: ticks are driven by hand.
///
/// Counts starts and cancels so callers can assert on timer churn.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualTimer {
    period: Option<Duration>,
    starts: u32,
    cancels: u32,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }

    pub fn cancels(&self) -> u32 {
        self.cancels
    }

    /// Intervals currently running (0 or 1).
    pub fn active_count(&self) -> u32 {
        self.starts - self.cancels
    }
}

impl IntervalTimer for ManualTimer {
    fn start(&mut self, period: Duration) {
        self.period = Some(period);
        self.starts += 1;
    }

    fn cancel(&mut self) {
        if self.period.take().is_some() {
            self.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.period.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{IntervalTimer, ManualTimer};
    use std::time::Duration;

    #[test]
    fn cancel_without_start_is_a_no_op() {
        let mut t = ManualTimer::new();
        t.cancel();
        assert_eq!(t.cancels(), 0);
        assert!(!t.is_active());
    }

    #[test]
    fn tracks_active_interval() {
        let mut t = ManualTimer::new();
        t.start(Duration::from_millis(420));
        assert!(t.is_active());
        assert_eq!(t.active_count(), 1);
        t.cancel();
        assert_eq!(t.active_count(), 0);
    }
}
