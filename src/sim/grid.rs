//! Tile grid: static base layer plus a sparse target overlay
//!
//! Rows are indexed by `y`, columns by `x`, both 0-based. Cells that are
//! neither wall nor floor (ragged-line padding, unknown glyphs) are void:
//! not passable and never used for spawning.

use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Integer grid coordinate. Signed so off-grid neighbours are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Move direction. Screen convention: `Up` decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit offset `(dx, dy)`
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Static tile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseTile {
    Wall,
    Floor,
}

impl BaseTile {
    #[inline]
    pub fn is_passable(self) -> bool {
        matches!(self, BaseTile::Floor)
    }
}

/// A stationary collectible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub pos: GridPos,
    pub value: u32,
}

/// Fixed-size two-layer tile grid
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    base: Vec<Vec<Option<BaseTile>>>,
    targets: Vec<Vec<Option<Target>>>,
    /// Every floor cell in row-major order, including the player's start
    spawn_cells: Vec<GridPos>,
}

impl Grid {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Base tile at `pos`; `None` for void or off-grid cells
    pub fn tile_at(&self, pos: GridPos) -> Option<BaseTile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.base[pos.y as usize][pos.x as usize]
    }

    pub fn is_passable(&self, pos: GridPos) -> bool {
        self.tile_at(pos).is_some_and(BaseTile::is_passable)
    }

    pub fn target_at(&self, pos: GridPos) -> Option<Target> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.targets[pos.y as usize][pos.x as usize]
    }

    /// Write the overlay at `pos`. Placing onto an occupied cell is a bug in
    /// the caller.
    pub fn set_target_at(&mut self, pos: GridPos, target: Option<Target>) {
        debug_assert!(self.in_bounds(pos), "target write outside grid at {pos:?}");
        let slot = &mut self.targets[pos.y as usize][pos.x as usize];
        debug_assert!(
            target.is_none() || slot.is_none(),
            "cell {pos:?} already holds a target"
        );
        *slot = target;
    }

    /// Remove and return the target at `pos`
    pub fn take_target(&mut self, pos: GridPos) -> Option<Target> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.targets[pos.y as usize][pos.x as usize].take()
    }

    /// Floor cells targets may appear on, fixed at load time
    pub fn candidate_spawn_cells(&self) -> &[GridPos] {
        &self.spawn_cells
    }

    /// Number of targets currently on the overlay
    pub fn target_count(&self) -> usize {
        self.targets.iter().flatten().filter(|t| t.is_some()).count()
    }

    /// Iterate base tiles row by row
    pub fn rows(&self) -> impl Iterator<Item = &[Option<BaseTile>]> {
        self.base.iter().map(Vec::as_slice)
    }

    /// Iterate overlay rows
    pub fn target_rows(&self) -> impl Iterator<Item = &[Option<Target>]> {
        self.targets.iter().map(Vec::as_slice)
    }
}

/// A parsed level: the grid and where the player starts
#[derive(Debug, Clone)]
pub struct Level {
    pub grid: Grid,
    pub player_start: GridPos,
}

impl Level {
    /// Parse a level map: `W` wall, `F` floor, `P` player (case-insensitive).
    /// Lines shorter than the widest one are padded with void cells.
    pub fn parse(text: &str) -> GameResult<Self> {
        let lines: Vec<&str> = text.lines().collect();
        Self::from_lines(&lines)
    }

    /// Read and parse a level from any buffered source
    pub fn from_reader(reader: impl BufRead) -> GameResult<Self> {
        let lines = reader.lines().collect::<Result<Vec<String>, _>>()?;
        Self::from_lines(&lines)
    }

    pub fn load_file(path: impl AsRef<Path>) -> GameResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let level = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!(
            "Loaded level {} ({}x{})",
            path.as_ref().display(),
            level.grid.width,
            level.grid.height
        );
        Ok(level)
    }

    fn from_lines<S: AsRef<str>>(lines: &[S]) -> GameResult<Self> {
        let width = lines
            .iter()
            .map(|l| l.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let height = lines.len();

        let mut base = vec![vec![None; width]; height];
        let mut spawn_cells = Vec::new();
        let mut player_start = None;

        for (y, line) in lines.iter().enumerate() {
            for (x, glyph) in line.as_ref().chars().enumerate() {
                let pos = GridPos::new(x as i32, y as i32);
                let tile = match glyph.to_ascii_uppercase() {
                    'W' => Some(BaseTile::Wall),
                    'F' => Some(BaseTile::Floor),
                    'P' => {
                        if player_start.replace(pos).is_some() {
                            return Err(GameError::LevelFormat(
                                "level contains more than one player".into(),
                            ));
                        }
                        Some(BaseTile::Floor)
                    }
                    ' ' => None,
                    other => {
                        log::warn!("Unknown level glyph {other:?} at ({x}, {y}), treating as void");
                        None
                    }
                };
                if tile == Some(BaseTile::Floor) {
                    spawn_cells.push(pos);
                }
                base[y][x] = tile;
            }
        }

        let player_start = player_start
            .ok_or_else(|| GameError::LevelFormat("level contains no player".into()))?;

        Ok(Self {
            grid: Grid {
                width,
                height,
                base,
                targets: vec![vec![None; width]; height],
                spawn_cells,
            },
            player_start,
        })
    }
}
