//! Platform layer: the threads that drive the simulation
//!
//! Handles:
//! - Time (display clock ticker)
//! - Input (move commands from the host)
//! - The unthrottled update/present loop

pub mod game_loop;
pub mod input;
pub mod time;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use game_loop::{GameLoop, Presenter};
pub use input::Controls;
pub use time::ElapsedClock;

/// Cooperative stop flag shared by every platform thread
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
