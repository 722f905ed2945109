//! # Game Module
//!
//! Core rules: battlefield coordinates, units, state, and every state transition.
//!
//! This module contains the fundamental building blocks of Gridbreach:
//! - Game state snapshots and persistence
//! - Units, teams and facings
//! - Visibility, combat and the action system
//! - The scripted opponent controller

pub mod actions;
pub mod combat;
pub mod opponent;
pub mod record;
pub mod state;
pub mod units;
pub mod visibility;

pub use actions::*;
pub use combat::*;
pub use opponent::*;
pub use record::*;
pub use state::*;
pub use units::*;
pub use visibility::*;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a tile coordinate on the battlefield.
///
/// # Examples
///
/// ```
/// use gridbreach::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert!(pos.in_bounds());
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridbreach::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether the position lies on the battlefield.
    pub fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < GRID_WIDTH && self.y >= 0 && self.y < GRID_HEIGHT
    }

    /// Returns the 4 cardinal neighbours in search expansion order:
    /// right, left, down, up.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y),
            Position::new(self.x, self.y + 1),
            Position::new(self.x, self.y - 1),
        ]
    }

    /// Formats the position as the `"x,y"` key used by persisted obstacle maps.
    pub fn to_key(self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parses a `"x,y"` key back into a position.
    pub fn from_key(key: &str) -> Option<Position> {
        let (x, y) = key.split_once(',')?;
        Some(Position::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Cardinal direction a unit is looking and aiming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Converts a facing to a unit position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridbreach::{Facing, Position};
    ///
    /// assert_eq!(Facing::Up.to_delta(), Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Facing::Up => Position::new(0, -1),
            Facing::Down => Position::new(0, 1),
            Facing::Left => Position::new(-1, 0),
            Facing::Right => Position::new(1, 0),
        }
    }

    /// Facing implied by a step delta.
    ///
    /// Horizontal wins when `|dx| > |dy|`, otherwise the vertical component
    /// decides. A zero delta yields `None` so the caller keeps its facing.
    pub fn from_step(delta: Position) -> Option<Facing> {
        if delta.x.abs() > delta.y.abs() {
            Some(if delta.x > 0 { Facing::Right } else { Facing::Left })
        } else if delta.y != 0 {
            Some(if delta.y > 0 { Facing::Down } else { Facing::Up })
        } else {
            None
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        };
        f.write_str(name)
    }
}

/// Side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    /// The opposing side.
    pub fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Player => f.write_str("player"),
            Team::Enemy => f.write_str("enemy"),
        }
    }
}

/// Stable identifier for a unit, e.g. `"p0"` or `"e3"`.
pub type UnitId = String;
