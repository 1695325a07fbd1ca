//! Read-only view of the game for the presentation layer

use glam::Vec2;
use serde::Serialize;

use super::entity::Actor;
use super::grid::{BaseTile, Direction};
use super::state::{GameMode, GameState};

/// One grid cell as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    /// `None` for void cells
    pub tile: Option<BaseTile>,
    /// Value of the ordinary target on this cell
    pub target: Option<u32>,
}

/// Which drawable an entity view describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Player,
    TransientTarget { bonus: u32 },
}

/// Interpolated entity pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    pub kind: EntityKind,
    /// Origin of the occupied cell in cell units (x right, y down); add 0.5
    /// on each axis for its centre
    pub position: Vec2,
    pub facing: Direction,
    /// Move animation completion, 1.0 at rest
    pub progress: f32,
}

impl EntityView {
    fn from_actor(kind: EntityKind, actor: &Actor) -> Self {
        Self {
            kind,
            position: actor.visual_pos(),
            facing: actor.facing,
            progress: actor.progress(),
        }
    }
}

/// Everything needed to draw one frame and its HUD
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub width: usize,
    pub height: usize,
    /// Cells row by row (`cells[y][x]`)
    pub cells: Vec<Vec<CellView>>,
    pub player: EntityView,
    pub transient: Option<EntityView>,
    pub collected_count: u32,
    pub collected_score: u64,
    /// Display clock, seconds since the first move command
    pub elapsed_secs: f64,
    pub mode: GameMode,
}

impl GameState {
    /// Capture the current frame
    pub fn snapshot(&self, elapsed_secs: f64) -> RenderSnapshot {
        let cells = self
            .grid
            .rows()
            .zip(self.grid.target_rows())
            .map(|(tiles, targets)| {
                tiles
                    .iter()
                    .zip(targets)
                    .map(|(tile, target)| CellView {
                        tile: *tile,
                        target: target.map(|t| t.value),
                    })
                    .collect()
            })
            .collect();

        RenderSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            cells,
            player: EntityView::from_actor(EntityKind::Player, &self.player.actor),
            transient: self.transient.as_ref().map(|t| {
                EntityView::from_actor(EntityKind::TransientTarget { bonus: t.bonus }, &t.actor)
            }),
            collected_count: self.collected_count,
            collected_score: self.collected_score,
            elapsed_secs,
            mode: self.mode,
        }
    }
}

impl RenderSnapshot {
    pub fn cell(&self, x: usize, y: usize) -> Option<&CellView> {
        self.cells.get(y).and_then(|row| row.get(x))
    }

    /// Number of ordinary targets visible
    pub fn target_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.target.is_some())
            .count()
    }
}
