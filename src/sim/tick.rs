//! Per-frame simulation tick
//!
//! Called once per rendered frame with the measured wall-clock delta. There is
//! no fixed timestep: animation progress scales with `dt`, while the transient
//! spawn roll happens once per call.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::grid::Direction;
use super::state::{GameEvent, GameMode, GameState};
use super::transient::{should_spawn, try_spawn};
use crate::error::GameResult;

/// Move command slot shared between the input thread and the simulation.
///
/// The simulation keeps retrying the held direction every tick and clears it
/// once the player is idle again. Commands that arrive while one is held are
/// refused, so the slot only changes hands between set and clear.
#[derive(Debug, Default)]
pub struct PendingDirection {
    slot: Mutex<Option<Direction>>,
}

impl PendingDirection {
    fn lock(&self) -> MutexGuard<'_, Option<Direction>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hold `direction` unless another command is still held. Returns whether
    /// it was taken.
    pub fn set(&self, direction: Direction) -> bool {
        let mut slot = self.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(direction);
        true
    }

    /// Current direction; stays held until `clear`
    pub fn get(&self) -> Option<Direction> {
        *self.lock()
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }
}

/// Advance the game by one frame of `dt` seconds.
///
/// Order: apply the held move, maybe spawn a transient target, advance
/// animations, resolve the transient target, check for game over. Once the
/// game is over this does nothing.
pub fn tick(state: &mut GameState, dt: f32) -> GameResult<()> {
    if state.mode == GameMode::Over {
        return Ok(());
    }
    state.time_ticks += 1;
    let dt = dt.max(0.0);

    // Held move, only from rest
    let held = state.pending.get();
    if let Some(direction) = held {
        if !state.player.actor.is_moving() {
            state.move_player(direction)?;
        }
    }

    if state.transient.is_none() && should_spawn(&mut state.rng, state.settings.transient_spawn_chance)
    {
        state.transient = try_spawn(&state.grid, state.player.pos(), &state.settings, &mut state.rng);
        if let Some(t) = &state.transient {
            state.events.push(GameEvent::TransientSpawned { pos: t.pos() });
        }
    }

    state.player.actor.update(dt);
    if let Some(t) = state.transient.as_mut() {
        t.actor.update(dt);
    }

    // Player at rest again: accept the next command
    if held.is_some() && !state.player.actor.is_moving() {
        state.pending.clear();
    }

    // Catching beats expiring when both happen on the same tick
    let caught = state
        .transient
        .as_ref()
        .is_some_and(|t| t.pos() == state.player.pos());
    if caught {
        state.collect_transient();
    } else if state.transient.as_ref().is_some_and(|t| !t.actor.is_moving()) {
        state.transient = None;
        state.events.push(GameEvent::TransientExpired);
        log::debug!("Transient target expired");
    }

    if state.collected_count >= state.settings.collect_threshold {
        state.mode = GameMode::Over;
        state.pending.clear();
        state.events.push(GameEvent::GameOver {
            score: state.collected_score,
        });
        log::info!(
            "Game over after {} ticks: {} collected, score {}",
            state.time_ticks,
            state.collected_count,
            state.collected_score
        );
    }

    Ok(())
}
