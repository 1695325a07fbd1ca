//! Simulation/render loop thread
//!
//! Runs as fast as the presenter allows: measure the wall-clock delta, tick the
//! game, hand a snapshot to the presenter. The stop signal is checked once per
//! iteration, so stopping always finishes the frame in flight.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::input::Controls;
use super::time::ElapsedClock;
use super::StopSignal;
use crate::error::{GameError, GameResult};
use crate::sim::{GameEvent, GameState, RenderSnapshot, tick};

/// Host-side drawing surface. Called on the loop thread once per frame with
/// the events recorded since the previous frame.
pub trait Presenter: Send + 'static {
    fn present(&mut self, frame: &RenderSnapshot, events: &[GameEvent]);
}

impl<F> Presenter for F
where
    F: FnMut(&RenderSnapshot, &[GameEvent]) + Send + 'static,
{
    fn present(&mut self, frame: &RenderSnapshot, events: &[GameEvent]) {
        self(frame, events)
    }
}

/// Handle to a running game
pub struct GameLoop {
    stop: StopSignal,
    clock: ElapsedClock,
    controls: Controls,
    handle: Option<JoinHandle<GameResult<GameState>>>,
}

impl GameLoop {
    /// Move `state` onto a new loop thread and start running it
    pub fn spawn<P: Presenter>(state: GameState, mut presenter: P) -> GameResult<Self> {
        let stop = StopSignal::new();
        let interval = Duration::from_millis(state.settings().clock_interval_ms);
        let clock = ElapsedClock::new(interval, stop.clone());
        let controls = Controls::new(state.pending_direction(), clock.clone());

        let loop_stop = stop.clone();
        let loop_clock = clock.clone();
        let handle = thread::Builder::new()
            .name("game-loop".into())
            .spawn(move || {
                let mut state = state;
                log::info!("Game loop running (seed {})", state.seed());
                let result = run(&mut state, &mut presenter, &loop_stop, &loop_clock);
                match result {
                    Ok(()) => {
                        log::info!("Game loop stopped after {} ticks", state.time_ticks());
                        Ok(state)
                    }
                    Err(e) => {
                        log::error!("Game loop aborted: {e}");
                        // Bring the clock down with the session
                        loop_stop.stop();
                        Err(e)
                    }
                }
            })?;

        Ok(Self {
            stop,
            clock,
            controls,
            handle: Some(handle),
        })
    }

    /// Input handle for the host
    pub fn controls(&self) -> Controls {
        self.controls.clone()
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// True once the loop thread has exited (stopped or aborted)
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signal both threads, wait for them, and return the final state or the
    /// error that ended the session
    pub fn stop(mut self) -> GameResult<GameState> {
        self.stop.stop();
        let result = match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| GameError::WorkerPanicked("game-loop"))?,
            None => Err(GameError::WorkerPanicked("game-loop")),
        };
        self.clock.join()?;
        result
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.stop.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        let _ = self.clock.join();
    }
}

fn run<P: Presenter>(
    state: &mut GameState,
    presenter: &mut P,
    stop: &StopSignal,
    clock: &ElapsedClock,
) -> GameResult<()> {
    let mut last = Instant::now();
    while !stop.is_stopped() {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        tick(state, dt)?;
        let events = state.drain_events();
        presenter.present(&state.snapshot(clock.elapsed_secs()), &events);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Direction, GameMode, GridPos};
    use std::sync::mpsc;

    const ROOM: &str = "WWWWW\nWFFFW\nWFPFW\nWFFFW\nWWWWW";

    fn settings() -> Settings {
        Settings {
            seed: Some(17),
            transient_spawn_chance: 0.0,
            clock_interval_ms: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_loop_runs_moves_and_stops() {
        let state = GameState::from_description(ROOM, settings()).unwrap();
        let (tx, rx) = mpsc::channel();
        let game = GameLoop::spawn(state, move |frame: &RenderSnapshot, _: &[GameEvent]| {
            let _ = tx.send((frame.player.position, frame.mode));
            thread::sleep(Duration::from_millis(1));
        })
        .unwrap();

        // First frame arrives
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let controls = game.controls();
        assert!(controls.command(Direction::Right));

        // Wait until the player has arrived and the slot is free again
        let deadline = Instant::now() + Duration::from_secs(5);
        while !controls.is_ready() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(controls.is_ready());
        assert!(controls.elapsed_secs() > 0.0);

        let state = game.stop().unwrap();
        assert_eq!(state.player().pos(), GridPos::new(3, 2));
        assert_eq!(state.mode(), GameMode::Running);
        assert!(state.time_ticks() > 0);
    }

    #[test]
    fn test_integrity_error_ends_session() {
        // No walls around the row: stepping up leaves the grid
        let state = GameState::from_description("FFPFF", settings()).unwrap();
        let game = GameLoop::spawn(state, |_: &RenderSnapshot, _: &[GameEvent]| {
            thread::sleep(Duration::from_millis(1));
        })
        .unwrap();
        let controls = game.controls();
        assert!(controls.command(Direction::Up));

        let deadline = Instant::now() + Duration::from_secs(5);
        while !game.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(game.is_finished());
        assert!(game.stop_signal().is_stopped());
        assert!(matches!(
            game.stop(),
            Err(GameError::LevelIntegrity { x: 2, y: -1 })
        ));
    }

    #[test]
    fn test_events_are_handed_to_presenter_each_frame() {
        // Transient spawns and expires every couple of ticks
        let settings = Settings {
            transient_spawn_chance: 1.0,
            transient_speed: 1000.0,
            ..settings()
        };
        let state = GameState::from_description(ROOM, settings).unwrap();
        let (tx, rx) = mpsc::channel();
        let game = GameLoop::spawn(state, move |_: &RenderSnapshot, events: &[GameEvent]| {
            let _ = tx.send(events.len());
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = 0;
        while seen < 100 && Instant::now() < deadline {
            seen += rx.recv_timeout(Duration::from_secs(1)).unwrap_or(0);
        }
        assert!(seen >= 100);

        // The last frame drained whatever the last tick recorded
        let mut state = game.stop().unwrap();
        assert!(state.drain_events().is_empty());
    }
}
