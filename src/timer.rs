use std::time::Instant;

/// Estimates the playback position between host updates.
///
/// D-Bus position queries are far too slow for a per-frame loop, so the
/// position is anchored whenever the host reports one (track change, seek,
/// periodic poll) and advanced against a monotonic clock while playing.
#[derive(Debug, Default)]
pub struct PlaybackTimer {
    /// Anchor position in milliseconds.
    anchor_ms: i64,
    /// Monotonic instant corresponding to `anchor_ms`; `None` while paused
    /// so wall-clock time spent paused never leaks into estimates.
    anchor_instant: Option<Instant>,
}

impl PlaybackTimer {
    /// Re-anchor at a host-reported position without assuming a playback
    /// state; callers follow up with `mark_playing`/`mark_paused`.
    pub fn reset(&mut self, position_ms: i64) {
        self.anchor_ms = sanitize_position(position_ms);
        self.anchor_instant = None;
    }

    /// Re-anchor at a host-reported position, keeping the clock running.
    pub fn set_position(&mut self, position_ms: i64) {
        self.anchor_ms = sanitize_position(position_ms);
        self.anchor_instant = Some(Instant::now());
    }

    pub fn mark_playing(&mut self) {
        // Measure elapsed time from the resume moment, not from the last
        // anchor, so paused duration is never counted.
        self.anchor_instant = Some(Instant::now());
    }

    pub fn mark_paused(&mut self) {
        let frozen = self.estimate(true);
        self.anchor_ms = frozen;
        self.anchor_instant = None;
    }

    pub fn estimate(&self, playing: bool) -> i64 {
        if !playing {
            return self.anchor_ms;
        }
        match self.anchor_instant {
            Some(instant) => self.anchor_ms + instant.elapsed().as_millis() as i64,
            None => self.anchor_ms,
        }
    }
}

pub fn sanitize_position(position_ms: i64) -> i64 {
    position_ms.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn negative_positions_are_clamped() {
        let mut timer = PlaybackTimer::default();
        timer.set_position(-250);
        assert_eq!(timer.estimate(false), 0);
    }

    #[test]
    fn paused_estimates_stay_at_the_anchor() {
        let mut timer = PlaybackTimer::default();
        timer.reset(42_000);
        assert_eq!(timer.estimate(false), 42_000);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.estimate(false), 42_000);
    }

    #[test]
    fn playing_estimates_advance() {
        let mut timer = PlaybackTimer::default();
        timer.set_position(1_000);
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.estimate(true) >= 1_010);
    }

    #[test]
    fn pause_freezes_the_running_estimate() {
        let mut timer = PlaybackTimer::default();
        timer.set_position(1_000);
        std::thread::sleep(Duration::from_millis(5));
        timer.mark_paused();
        let frozen = timer.estimate(true);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.estimate(true), frozen);
    }

    #[test]
    fn reset_does_not_start_the_clock() {
        let mut timer = PlaybackTimer::default();
        timer.reset(9_000);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.estimate(true), 9_000);
    }
}
