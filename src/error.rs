//! Error types
//!
//! Gameplay rejections (walking into a wall, an abandoned transient spawn) are
//! not errors; they come back as `bool`/`Option` from the simulation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Level text is structurally wrong (player count, no rows)
    #[error("invalid level: {0}")]
    LevelFormat(String),

    /// Level data could not be read, or a thread could not be spawned
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A move resolved outside the grid: the level is not enclosed by walls
    #[error("move left the grid at ({x}, {y}); level is not enclosed")]
    LevelIntegrity { x: i32, y: i32 },

    /// Placement found no free spawn cell
    #[error("no eligible spawn cell after {attempts} attempts")]
    NoEligibleCell { attempts: u32 },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A background thread panicked before it could be joined cleanly
    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),
}

pub type GameResult<T> = Result<T, GameError>;
