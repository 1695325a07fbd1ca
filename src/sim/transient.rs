//! Transient (bonus) target spawning
//!
//! A transient target appears on a free cell and makes a single move to a
//! random passable neighbour. It disappears once that move finishes unless
//! the player catches it first.

use rand::Rng;
use rand::seq::SliceRandom;

use super::entity::TransientTarget;
use super::grid::{Direction, Grid, GridPos};
use super::reward::pick_spawn_cell;
use crate::settings::Settings;

/// Roll the per-tick spawn chance
pub fn should_spawn<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.random::<f64>() < chance
}

/// First passable neighbour of `source`, trying directions in shuffled order
pub fn choose_destination<R: Rng + ?Sized>(
    grid: &Grid,
    source: GridPos,
    rng: &mut R,
) -> Option<(Direction, GridPos)> {
    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);
    dirs.into_iter()
        .map(|d| (d, source.step(d)))
        .find(|&(_, cell)| grid.is_passable(cell))
}

/// Try to create a transient target. `None` means the attempt was abandoned
/// (no free source cell, or a boxed-in source); that is a normal outcome.
pub fn try_spawn<R: Rng + ?Sized>(
    grid: &Grid,
    player: GridPos,
    settings: &Settings,
    rng: &mut R,
) -> Option<TransientTarget> {
    let Ok(source) = pick_spawn_cell(grid, player, rng, settings.max_placement_attempts) else {
        log::debug!("Transient spawn skipped: no free source cell");
        return None;
    };

    let Some((dir, destination)) = choose_destination(grid, source, rng) else {
        log::debug!("Transient spawn abandoned: ({}, {}) is boxed in", source.x, source.y);
        return None;
    };

    log::debug!(
        "Transient target at ({}, {}) heading {:?}",
        source.x,
        source.y,
        dir
    );
    Some(TransientTarget::launch(
        source,
        destination,
        settings.transient_speed,
        settings.transient_bonus,
    ))
}
