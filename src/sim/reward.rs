//! Ordinary target creation: weighted value roll and free-cell placement

use rand::Rng;

use super::grid::{Grid, GridPos, Target};
use crate::error::{GameError, GameResult};
use crate::settings::RewardTable;

impl RewardTable {
    /// Roll a target value: first bucket whose threshold exceeds `u`, else the last
    pub fn choose_value<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let u: f64 = rng.random();
        self.value_for(u)
    }

    /// Bucket lookup for a uniform draw `u` in [0, 1)
    pub fn value_for(&self, u: f64) -> u32 {
        let index = self
            .thresholds
            .iter()
            .position(|&t| u < t)
            .unwrap_or(self.values.len() - 1);
        self.values[index]
    }
}

#[inline]
fn is_eligible(grid: &Grid, player: GridPos, cell: GridPos) -> bool {
    cell != player && grid.target_at(cell).is_none()
}

/// Pick a spawn cell that is neither the player's cell nor holding a target.
///
/// Draws uniformly with rejection up to `max_attempts` times, then falls back
/// to a uniform pick among the remaining eligible cells so crowded grids still
/// terminate. Fails only when no eligible cell exists at all.
pub fn pick_spawn_cell<R: Rng + ?Sized>(
    grid: &Grid,
    player: GridPos,
    rng: &mut R,
    max_attempts: u32,
) -> GameResult<GridPos> {
    let cells = grid.candidate_spawn_cells();
    if cells.is_empty() {
        return Err(GameError::NoEligibleCell { attempts: 0 });
    }

    for _ in 0..max_attempts {
        let cell = cells[rng.random_range(0..cells.len())];
        if is_eligible(grid, player, cell) {
            return Ok(cell);
        }
    }

    let free: Vec<GridPos> = cells
        .iter()
        .copied()
        .filter(|&c| is_eligible(grid, player, c))
        .collect();
    if free.is_empty() {
        return Err(GameError::NoEligibleCell {
            attempts: max_attempts,
        });
    }
    log::debug!(
        "Placement fell back to scan after {} rejected draws ({} free cells)",
        max_attempts,
        free.len()
    );
    Ok(free[rng.random_range(0..free.len())])
}

/// Place one ordinary target on the overlay and return it.
/// The caller tracks it in its live set.
pub fn spawn_ordinary_target<R: Rng + ?Sized>(
    grid: &mut Grid,
    player: GridPos,
    table: &RewardTable,
    rng: &mut R,
    max_attempts: u32,
) -> GameResult<Target> {
    let pos = pick_spawn_cell(grid, player, rng, max_attempts)?;
    let target = Target {
        pos,
        value: table.choose_value(rng),
    };
    grid.set_target_at(pos, Some(target));
    log::debug!("Spawned target worth {} at ({}, {})", target.value, pos.x, pos.y);
    Ok(target)
}
