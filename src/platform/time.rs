//! Display clock
//!
//! A ticker thread that counts elapsed play time for the HUD. The simulation
//! never reads it; frame deltas are measured separately by the game loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::StopSignal;
use crate::error::{GameError, GameResult};

#[derive(Debug)]
struct ClockInner {
    interval: Duration,
    ticks: AtomicU64,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// Elapsed-time counter advanced by a background thread. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ElapsedClock {
    inner: Arc<ClockInner>,
    stop: StopSignal,
}

impl ElapsedClock {
    pub fn new(interval: Duration, stop: StopSignal) -> Self {
        Self {
            inner: Arc::new(ClockInner {
                interval,
                ticks: AtomicU64::new(0),
                handle: Mutex::new(None),
            }),
            stop,
        }
    }

    /// Start ticking from zero. Later calls are no-ops.
    pub fn start(&self) -> GameResult<()> {
        let mut handle = self
            .inner
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if handle.is_some() || self.stop.is_stopped() {
            return Ok(());
        }
        self.inner.ticks.store(0, Ordering::Release);

        let inner = Arc::clone(&self.inner);
        let stop = self.stop.clone();
        let spawned = thread::Builder::new()
            .name("display-clock".into())
            .spawn(move || {
                while !stop.is_stopped() {
                    inner.ticks.fetch_add(1, Ordering::AcqRel);
                    thread::sleep(inner.interval);
                }
            })?;
        *handle = Some(spawned);
        log::debug!("Display clock started ({:?} cadence)", self.inner.interval);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Elapsed display time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.inner.ticks.load(Ordering::Acquire) as f64 * self.inner.interval.as_secs_f64()
    }

    /// Wait for the ticker to exit. Call after raising the stop signal.
    pub fn join(&self) -> GameResult<()> {
        let handle = self
            .inner
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle
                .join()
                .map_err(|_| GameError::WorkerPanicked("display-clock"))?;
        }
        Ok(())
    }
}
