//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay single-threaded and
//! deterministic:
//! - Seeded RNG only
//! - Logical positions change when a move starts, never when it ends
//! - No rendering or platform dependencies

pub mod entity;
pub mod grid;
pub mod reward;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod transient;

pub use entity::{Actor, Motion, Player, TransientTarget};
pub use grid::{BaseTile, Direction, Grid, GridPos, Level, Target};
pub use reward::{pick_spawn_cell, spawn_ordinary_target};
pub use snapshot::{CellView, EntityKind, EntityView, RenderSnapshot};
pub use state::{GameEvent, GameMode, GameState};
pub use tick::{PendingDirection, tick};
