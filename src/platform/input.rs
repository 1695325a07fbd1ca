//! Input handle for the host's gesture/key decoder

use std::sync::Arc;

use super::time::ElapsedClock;
use crate::sim::{Direction, PendingDirection};

/// Cloneable handle for issuing move commands from any thread
#[derive(Debug, Clone)]
pub struct Controls {
    pending: Arc<PendingDirection>,
    clock: ElapsedClock,
}

impl Controls {
    pub fn new(pending: Arc<PendingDirection>, clock: ElapsedClock) -> Self {
        Self { pending, clock }
    }

    /// Queue a move. Ignored while a previous command is still being played
    /// out. The first accepted command starts the display clock.
    pub fn command(&self, direction: Direction) -> bool {
        if !self.pending.set(direction) {
            return false;
        }
        if let Err(e) = self.clock.start() {
            log::warn!("Display clock unavailable: {e}");
        }
        true
    }

    /// Whether a new command would be accepted now
    pub fn is_ready(&self) -> bool {
        self.pending.get().is_none()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StopSignal;
    use std::time::Duration;

    #[test]
    fn test_command_guard_and_clock_start() {
        let stop = StopSignal::new();
        let clock = ElapsedClock::new(Duration::from_millis(1), stop.clone());
        let pending = Arc::new(PendingDirection::default());
        let controls = Controls::new(Arc::clone(&pending), clock.clone());

        assert!(controls.is_ready());
        assert!(!clock.is_running());
        assert!(controls.command(Direction::Up));
        assert!(clock.is_running());
        assert!(!controls.command(Direction::Down));
        assert_eq!(pending.get(), Some(Direction::Up));

        pending.clear();
        assert!(controls.command(Direction::Down));

        stop.stop();
        clock.join().unwrap();
    }
}
