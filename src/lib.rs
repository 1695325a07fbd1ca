//! Tile Collector - a grid-based single-player collector game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, animated moves, target spawning, game state)
//! - `platform`: Threads driving the simulation (game loop, display clock, input slot)
//! - `settings`: Data-driven game balance
//! - `error`: Failure taxonomy for level loading and runtime integrity

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{GameError, GameResult};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Ordinary targets kept on the grid at all times
    pub const TARGET_COUNT: usize = 3;
    /// Collected targets that end the session
    pub const COLLECT_THRESHOLD: u32 = 30;

    /// Score values of ordinary targets, cheapest first
    pub const TARGET_VALUES: [u32; 4] = [1, 2, 4, 8];
    /// Cumulative probability thresholds; the last bucket takes the remainder
    pub const TARGET_THRESHOLDS: [f64; 3] = [0.60, 0.80, 0.95];

    /// Player travel speed (cells per second)
    pub const PLAYER_SPEED: f32 = 4.0;

    /// Transient target spawn chance, rolled once per tick (not per second)
    pub const TRANSIENT_SPAWN_CHANCE: f64 = 0.004;
    /// Transient target travel speed (cells per second)
    pub const TRANSIENT_SPEED: f32 = 0.4;
    /// Bonus awarded for catching the transient target
    pub const TRANSIENT_BONUS: u32 = 10;

    /// Rejection-sampling draws before falling back to an exhaustive scan
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1024;

    /// Display clock cadence in milliseconds
    pub const CLOCK_INTERVAL_MS: u64 = 10;
}
