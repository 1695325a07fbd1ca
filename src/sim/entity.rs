//! Animated entities and their move state machine
//!
//! An entity's grid position is authoritative and jumps to the destination
//! the moment a move starts. The `Motion` state only drives the cosmetic
//! interpolation that plays out over the following ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, GridPos};

/// Move animation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Idle,
    Moving {
        origin: GridPos,
        destination: GridPos,
        /// 0..=1 share of the travel already shown
        progress: f32,
        /// Cells per second
        speed: f32,
    },
}

/// Position plus move animation, shared by the player and transient targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: GridPos,
    pub motion: Motion,
    /// Direction of the last accepted move
    pub facing: Direction,
}

impl Actor {
    pub fn new(pos: GridPos) -> Self {
        Self {
            pos,
            motion: Motion::Idle,
            facing: Direction::Down,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        matches!(self.motion, Motion::Moving { .. })
    }

    /// Start a move. The logical position switches to `destination` now.
    /// Callers must not start a move while one is running.
    pub fn begin_move(&mut self, destination: GridPos, speed: f32) {
        debug_assert!(!self.is_moving(), "move started while already moving");
        let origin = self.pos;
        if let Some(dir) = Direction::ALL
            .into_iter()
            .find(|d| origin.step(*d) == destination)
        {
            self.facing = dir;
        }
        self.pos = destination;
        self.motion = Motion::Moving {
            origin,
            destination,
            progress: 0.0,
            speed,
        };
    }

    /// Advance the animation by `dt` seconds; flips to `Idle` on arrival
    pub fn update(&mut self, dt: f32) {
        if let Motion::Moving {
            origin,
            destination,
            progress,
            speed,
        } = &mut self.motion
        {
            let dx = (destination.x - origin.x) as f32;
            let dy = (destination.y - origin.y) as f32;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance <= f32::EPSILON {
                self.motion = Motion::Idle;
                return;
            }
            *progress = (*progress + dt.max(0.0) * *speed / distance).min(1.0);
            if *progress >= 1.0 {
                self.motion = Motion::Idle;
            }
        }
    }

    /// Animation completion, 1.0 when idle
    pub fn progress(&self) -> f32 {
        match self.motion {
            Motion::Idle => 1.0,
            Motion::Moving { progress, .. } => progress,
        }
    }

    /// Interpolated cell origin (top-left corner) in cell units, for rendering only
    pub fn visual_pos(&self) -> Vec2 {
        match self.motion {
            Motion::Idle => cell_origin(self.pos),
            Motion::Moving {
                origin,
                destination,
                progress,
                ..
            } => cell_origin(origin).lerp(cell_origin(destination), progress),
        }
    }
}

#[inline]
fn cell_origin(pos: GridPos) -> Vec2 {
    Vec2::new(pos.x as f32, pos.y as f32)
}

/// The single player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub actor: Actor,
    /// Travel speed (cells per second)
    pub speed: f32,
}

impl Player {
    pub fn new(pos: GridPos, speed: f32) -> Self {
        Self {
            actor: Actor::new(pos),
            speed,
        }
    }

    #[inline]
    pub fn pos(&self) -> GridPos {
        self.actor.pos
    }
}

/// Bonus collectible that makes one move and then vanishes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransientTarget {
    pub actor: Actor,
    pub bonus: u32,
}

impl TransientTarget {
    /// Create at `source` and immediately send it towards `destination`
    pub fn launch(source: GridPos, destination: GridPos, speed: f32, bonus: u32) -> Self {
        let mut actor = Actor::new(source);
        actor.begin_move(destination, speed);
        Self { actor, bonus }
    }

    #[inline]
    pub fn pos(&self) -> GridPos {
        self.actor.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_position_snaps_immediately() {
        let mut actor = Actor::new(GridPos::new(2, 2));
        actor.begin_move(GridPos::new(3, 2), 4.0);
        assert_eq!(actor.pos, GridPos::new(3, 2));
        assert!(actor.is_moving());
        assert_eq!(actor.facing, Direction::Right);
        // Visual position still at the origin
        assert_eq!(actor.visual_pos(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_animation_completes_after_travel_time() {
        let mut actor = Actor::new(GridPos::new(0, 0));
        actor.begin_move(GridPos::new(0, 1), 4.0);

        actor.update(0.125);
        assert!(actor.is_moving());
        assert!((actor.progress() - 0.5).abs() < 1e-6);
        assert!((actor.visual_pos().y - 0.5).abs() < 1e-6);

        actor.update(0.2);
        assert!(!actor.is_moving());
        assert_eq!(actor.progress(), 1.0);
        assert_eq!(actor.visual_pos(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_update_idle_is_noop() {
        let mut actor = Actor::new(GridPos::new(1, 1));
        actor.update(10.0);
        assert_eq!(actor.motion, Motion::Idle);
        assert_eq!(actor.pos, GridPos::new(1, 1));
    }

    #[test]
    fn test_slow_transient_travel() {
        let mut t = TransientTarget::launch(GridPos::new(1, 1), GridPos::new(1, 0), 0.4, 10);
        assert_eq!(t.pos(), GridPos::new(1, 0));
        assert_eq!(t.actor.facing, Direction::Up);
        t.actor.update(2.0);
        assert!(t.actor.is_moving());
        t.actor.update(0.6);
        assert!(!t.actor.is_moving());
    }
}
