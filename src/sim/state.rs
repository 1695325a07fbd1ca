//! Game state and the player move protocol
//!
//! Everything here is owned by the simulation thread. The only piece shared
//! with other threads is the pending-direction slot.

use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Player, TransientTarget};
use super::grid::{Direction, Grid, GridPos, Level, Target};
use super::reward::spawn_ordinary_target;
use super::tick::PendingDirection;
use crate::error::{GameError, GameResult};
use crate::settings::Settings;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Waiting for the first move command
    #[default]
    NotStarted,
    Running,
    /// Collection threshold reached; the simulation is frozen
    Over,
}

/// Things that happened during a tick, for sound/effects in the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TargetCollected { value: u32, pos: GridPos },
    TransientSpawned { pos: GridPos },
    TransientCollected { bonus: u32 },
    TransientExpired,
    GameOver { score: u64 },
}

/// Complete game state (deterministic for a given level, settings and seed)
#[derive(Debug)]
pub struct GameState {
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) settings: Settings,
    pub(crate) grid: Grid,
    pub(crate) player: Player,
    /// Live ordinary targets, mirrored on the grid overlay
    pub(crate) targets: Vec<Target>,
    pub(crate) transient: Option<TransientTarget>,
    pub(crate) collected_count: u32,
    pub(crate) collected_score: u64,
    pub(crate) mode: GameMode,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) pending: Arc<PendingDirection>,
}

impl GameState {
    /// Build a game from a parsed level and place the initial targets
    pub fn new(level: Level, settings: Settings) -> GameResult<Self> {
        settings.validate()?;
        let seed = settings.resolve_seed();
        let Level { grid, player_start } = level;

        // Every spawn cell except the player's start can hold a target
        let free_cells = grid.candidate_spawn_cells().len().saturating_sub(1);
        if settings.target_count > free_cells {
            return Err(GameError::InvalidSettings(format!(
                "target_count {} does not fit the {free_cells} free cells of this level",
                settings.target_count
            )));
        }

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(player_start, settings.player_speed),
            targets: Vec::with_capacity(settings.target_count),
            settings,
            grid,
            transient: None,
            collected_count: 0,
            collected_score: 0,
            mode: GameMode::NotStarted,
            time_ticks: 0,
            events: Vec::new(),
            pending: Arc::new(PendingDirection::default()),
        };

        for _ in 0..state.settings.target_count {
            state.spawn_target()?;
        }

        log::info!(
            "Game ready: {}x{} grid, player at ({}, {}), seed {}",
            state.grid.width(),
            state.grid.height(),
            player_start.x,
            player_start.y,
            seed
        );
        Ok(state)
    }

    /// Parse a level description and build a game from it
    pub fn from_description(text: &str, settings: Settings) -> GameResult<Self> {
        Self::new(Level::parse(text)?, settings)
    }

    /// Try to move the player one cell.
    ///
    /// Returns `Ok(false)` when the move is refused (wall, void, animation still
    /// running, game over). The player's grid position changes immediately;
    /// targets on the destination are collected before this returns, without
    /// waiting for the move animation.
    pub fn move_player(&mut self, direction: Direction) -> GameResult<bool> {
        match self.mode {
            GameMode::Over => return Ok(false),
            GameMode::NotStarted => {
                log::info!("Game started");
                self.mode = GameMode::Running;
            }
            GameMode::Running => {}
        }
        if self.player.actor.is_moving() {
            return Ok(false);
        }

        let destination = self.player.pos().step(direction);
        if !self.grid.in_bounds(destination) {
            return Err(GameError::LevelIntegrity {
                x: destination.x,
                y: destination.y,
            });
        }
        if !self.grid.is_passable(destination) {
            return Ok(false);
        }

        self.player.actor.begin_move(destination, self.player.speed);

        if let Some(target) = self.grid.take_target(destination) {
            self.targets.retain(|t| t.pos != destination);
            self.collected_count += 1;
            self.collected_score += u64::from(target.value);
            self.events.push(GameEvent::TargetCollected {
                value: target.value,
                pos: destination,
            });
            log::debug!(
                "Collected target worth {} ({} collected, score {})",
                target.value,
                self.collected_count,
                self.collected_score
            );
            self.spawn_target()?;
        }

        if self
            .transient
            .as_ref()
            .is_some_and(|t| t.pos() == destination)
        {
            self.collect_transient();
        }

        Ok(true)
    }

    /// Place one replacement ordinary target
    fn spawn_target(&mut self) -> GameResult<()> {
        let target = spawn_ordinary_target(
            &mut self.grid,
            self.player.pos(),
            &self.settings.rewards,
            &mut self.rng,
            self.settings.max_placement_attempts,
        )?;
        self.targets.push(target);
        Ok(())
    }

    /// Award and remove the transient target, if any
    pub(crate) fn collect_transient(&mut self) {
        if let Some(t) = self.transient.take() {
            self.collected_score += u64::from(t.bonus);
            self.events.push(GameEvent::TransientCollected { bonus: t.bonus });
            log::debug!("Caught transient target (+{})", t.bonus);
        }
    }

    /// Handle to the move-command slot, for the input thread
    pub fn pending_direction(&self) -> Arc<PendingDirection> {
        Arc::clone(&self.pending)
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn transient(&self) -> Option<&TransientTarget> {
        self.transient.as_ref()
    }

    pub fn collected_count(&self) -> u32 {
        self.collected_count
    }

    pub fn collected_score(&self) -> u64 {
        self.collected_score
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "WWWWW\nWFFFW\nWFPFW\nWFFFW\nWWWWW";

    fn seeded(seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Replace the random targets with a known layout
    fn place_targets(state: &mut GameState, targets: &[(i32, i32, u32)]) {
        for t in state.targets.drain(..) {
            state.grid.take_target(t.pos);
        }
        for &(x, y, value) in targets {
            let pos = GridPos::new(x, y);
            let target = Target { pos, value };
            state.grid.set_target_at(pos, Some(target));
            state.targets.push(target);
        }
    }

    #[test]
    fn test_load_places_three_targets() {
        for seed in 0..50 {
            let state = GameState::from_description(ROOM, seeded(seed)).unwrap();
            assert_eq!(state.targets().len(), 3);
            assert_eq!(state.grid().target_count(), 3);
            assert!(state.grid().target_at(GridPos::new(2, 2)).is_none());
            assert_eq!(state.mode(), GameMode::NotStarted);
        }
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            GameState::from_description("WWWW\nWPPW\nWWWW", seeded(1)),
            Err(GameError::LevelFormat(_))
        ));
        assert!(matches!(
            GameState::from_description("WWW\nWFW\nWWW", seeded(1)),
            Err(GameError::LevelFormat(_))
        ));
        // Three targets cannot fit beside the player
        assert!(matches!(
            GameState::from_description("WWWWW\nWPFFW\nWWWWW", seeded(1)),
            Err(GameError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_oversized_target_count_is_rejected_before_placement() {
        let settings =
            Settings::from_json(r#"{ "target_count": 4000000000000000000, "seed": 1 }"#).unwrap();
        assert!(matches!(
            GameState::from_description(ROOM, settings),
            Err(GameError::InvalidSettings(_))
        ));

        // The room has 8 free cells around the player: 8 fit, 9 do not
        let fits = Settings { target_count: 8, ..seeded(2) };
        let state = GameState::from_description(ROOM, fits).unwrap();
        assert_eq!(state.grid().target_count(), 8);
        let too_many = Settings { target_count: 9, ..seeded(2) };
        assert!(matches!(
            GameState::from_description(ROOM, too_many),
            Err(GameError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_move_right_and_up() {
        let mut state = GameState::from_description(ROOM, seeded(3)).unwrap();
        assert!(state.move_player(Direction::Right).unwrap());
        assert_eq!(state.player().pos(), GridPos::new(3, 2));
        assert_eq!(state.mode(), GameMode::Running);

        let mut state = GameState::from_description(ROOM, seeded(3)).unwrap();
        assert!(state.move_player(Direction::Up).unwrap());
        assert_eq!(state.player().pos(), GridPos::new(2, 1));
    }

    #[test]
    fn test_move_into_wall_is_rejected() {
        let mut state = GameState::from_description(ROOM, seeded(4)).unwrap();
        assert!(state.move_player(Direction::Up).unwrap());
        // Finish the animation so the next command is not blocked
        state.player.actor.update(1.0);
        assert!(!state.move_player(Direction::Up).unwrap());
        assert_eq!(state.player().pos(), GridPos::new(2, 1));
    }

    #[test]
    fn test_move_blocked_while_animating() {
        let mut state = GameState::from_description(ROOM, seeded(5)).unwrap();
        assert!(state.move_player(Direction::Left).unwrap());
        assert!(!state.move_player(Direction::Right).unwrap());
        assert_eq!(state.player().pos(), GridPos::new(1, 2));
    }

    #[test]
    fn test_collect_replaces_target_synchronously() {
        let mut state = GameState::from_description(ROOM, seeded(6)).unwrap();
        place_targets(&mut state, &[(3, 2, 4), (1, 1, 1), (1, 3, 2)]);

        assert!(state.move_player(Direction::Right).unwrap());
        assert_eq!(state.collected_count(), 1);
        assert_eq!(state.collected_score(), 4);
        assert_eq!(state.targets().len(), 3);
        assert_eq!(state.grid().target_count(), 3);
        // Replacement never lands under the player
        assert!(state.grid().target_at(GridPos::new(3, 2)).is_none());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::TargetCollected { value: 4, pos: GridPos::new(3, 2) })
        );
    }

    #[test]
    fn test_collect_transient_on_move() {
        let mut state = GameState::from_description(ROOM, seeded(7)).unwrap();
        place_targets(&mut state, &[(1, 1, 1), (1, 3, 1), (3, 3, 1)]);
        state.transient = Some(TransientTarget::launch(
            GridPos::new(3, 1),
            GridPos::new(3, 2),
            0.4,
            10,
        ));

        assert!(state.move_player(Direction::Right).unwrap());
        assert!(state.transient().is_none());
        assert_eq!(state.collected_score(), 10);
        // Bonus does not count as a collected target
        assert_eq!(state.collected_count(), 0);
    }

    #[test]
    fn test_unenclosed_level_is_integrity_error() {
        let mut state = GameState::from_description("FPFFF", seeded(8)).unwrap();
        assert!(state.move_player(Direction::Right).unwrap());
        state.player.actor.update(1.0);
        let result = state.move_player(Direction::Up);
        assert!(matches!(
            result,
            Err(GameError::LevelIntegrity { x: 2, y: -1 })
        ));
    }

    #[test]
    fn test_void_cell_is_impassable() {
        let mut state =
            GameState::from_description("WWWWWW\nWPFFF\nWFFFFW\nWWWWWW", seeded(9)).unwrap();
        state.player.actor.pos = GridPos::new(4, 1);
        assert!(!state.move_player(Direction::Right).unwrap());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            target_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::from_description(ROOM, settings),
            Err(GameError::InvalidSettings(_))
        ));
    }
}
