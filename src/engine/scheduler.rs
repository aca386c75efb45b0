//! Start/stop state for the per-frame synchronization loop.
//!
//! The cadence itself belongs to the host: the UI loop calls
//! [`crate::engine::LyricEngine::tick`] once per display refresh, and this
//! state decides whether a tick does any work. Stopping is synchronous:
//! once stopped, a tick that still arrives is a no-op, which is what makes
//! teardown and document replacement safe without cancellation plumbing.

#[derive(Debug, Default)]
pub struct FrameScheduler {
    running: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped_and_toggles() {
        let mut scheduler = FrameScheduler::new();
        assert!(!scheduler.is_running());
        scheduler.start();
        assert!(scheduler.is_running());
        scheduler.stop();
        assert!(!scheduler.is_running());
        // Stopping twice is fine; teardown is idempotent.
        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
