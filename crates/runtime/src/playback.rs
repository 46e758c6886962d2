use std::time::Duration;

use tracing::debug;

use crate::timer::IntervalTimer;

/// Period between automatic hour advances.
pub const DEFAULT_PLAYBACK_INTERVAL: Duration = Duration::from_millis(420);

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

/// Play/pause state machine over a single interval timer.
///
/// `play` always cancels first, so repeated starts never stack intervals.
#[derive(Debug)]
pub struct Playback<T: IntervalTimer> {
    timer: T,
    period: Duration,
    state: PlaybackState,
}

impl<T: IntervalTimer> Playback<T> {
    pub fn new(timer: T, period: Duration) -> Self {
        Self {
            timer,
            period,
            state: PlaybackState::Stopped,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn play(&mut self) {
        self.stop();
        self.timer.start(self.period);
        self.state = PlaybackState::Playing;
        debug!(period_ms = self.period.as_millis() as u64, "playback started");
    }

    /// Cancels the timer. Returns whether playback was running.
    pub fn stop(&mut self) -> bool {
        if self.timer.is_active() {
            self.timer.cancel();
        }
        let was_playing = self.is_playing();
        self.state = PlaybackState::Stopped;
        if was_playing {
            debug!("playback stopped");
        }
        was_playing
    }

    pub fn toggle(&mut self) -> PlaybackState {
        if self.is_playing() {
            self.stop();
        } else {
            self.play();
        }
        self.state
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}

/// Index selected by one playback tick: `current + 1`, wrapping to 0 after
/// the last index. With zero or one hours this is always 0.
pub fn next_index(current: usize, len: usize) -> usize {
    let last = len.saturating_sub(1);
    if current >= last { 0 } else { current + 1 }
}

#[cfg(test)]
mod tests {
    use super::{next_index, Playback, PlaybackState, DEFAULT_PLAYBACK_INTERVAL};
    use crate::timer::{IntervalTimer, ManualTimer};
    use std::time::Duration;

    fn playback() -> Playback<ManualTimer> {
        Playback::new(ManualTimer::new(), DEFAULT_PLAYBACK_INTERVAL)
    }

    #[test]
    fn play_starts_one_interval_at_configured_period() {
        let mut p = playback();
        p.play();
        assert_eq!(p.state(), PlaybackState::Playing);
        assert_eq!(p.timer().period(), Some(Duration::from_millis(420)));
        assert_eq!(p.timer().active_count(), 1);
    }

    #[test]
    fn playing_twice_keeps_a_single_timer() {
        let mut p = playback();
        p.play();
        p.play();
        assert_eq!(p.timer().starts(), 2);
        assert_eq!(p.timer().cancels(), 1);
        assert_eq!(p.timer().active_count(), 1);
    }

    #[test]
    fn stop_cancels_and_reports_previous_state() {
        let mut p = playback();
        assert!(!p.stop());
        p.play();
        assert!(p.stop());
        assert!(!p.timer().is_active());
        assert_eq!(p.state(), PlaybackState::Stopped);
    }

    #[test]
    fn toggle_alternates() {
        let mut p = playback();
        assert_eq!(p.toggle(), PlaybackState::Playing);
        assert_eq!(p.toggle(), PlaybackState::Stopped);
        assert_eq!(p.timer().active_count(), 0);
    }

    #[test]
    fn next_index_wraps_after_last() {
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(next_index(1, 3), 2);
        assert_eq!(next_index(2, 3), 0);
    }

    #[test]
    fn next_index_degenerates_for_tiny_timelines() {
        assert_eq!(next_index(0, 1), 0);
        assert_eq!(next_index(0, 0), 0);
    }
}
