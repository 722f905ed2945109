//! # Visibility
//!
//! Fog-of-war computation from player unit positions and facings.
//!
//! Visibility is always recomputed from scratch over every unit. Squads are
//! small, so a full pass after each action costs a few hundred tile writes.

use crate::config::{CONE_DEPTH, GRID_HEIGHT, GRID_WIDTH, SIGHT_RADIUS};
use crate::game::{Facing, Position, Team, Unit};
use serde::{Deserialize, Serialize};

/// A grid-shaped boolean matrix indexed as `cells[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileMask {
    cells: Vec<Vec<bool>>,
}

impl TileMask {
    /// Creates a battlefield-sized mask with every cell set to `value`.
    pub fn filled(value: bool) -> Self {
        Self {
            cells: vec![vec![value; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
        }
    }

    /// Reads a cell. Out-of-bounds positions read as `None`.
    pub fn get(&self, pos: Position) -> Option<bool> {
        if !pos.in_bounds() {
            return None;
        }
        self.cells
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
    }

    /// Writes a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, value: bool) {
        if !pos.in_bounds() {
            return;
        }
        if let Some(cell) = self
            .cells
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
        {
            *cell = value;
        }
    }

    /// Whether the mask has exactly the battlefield's dimensions.
    pub fn has_grid_dimensions(&self) -> bool {
        self.cells.len() == GRID_HEIGHT as usize
            && self.cells.iter().all(|row| row.len() == GRID_WIDTH as usize)
    }

    /// Number of cells set to true.
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell).count()
    }
}

/// Result of a visibility pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    /// `true` means hidden this turn
    pub fog: TileMask,
    /// `true` once any player unit has ever seen the tile
    pub visited: TileMask,
}

/// Recomputes fog of war and extends the visited memory.
///
/// Each living player unit reveals every tile within Euclidean distance 4.5,
/// plus a widening cone along its facing: at ring `i` (1 to 7) the tiles at
/// lateral offsets `-i..=i` are revealed regardless of the radial cutoff.
/// Enemy units and down units contribute nothing.
///
/// # Examples
///
/// ```
/// use gridbreach::{compute_visibility, Facing, Position, Team, TileMask, Unit, UnitStats};
///
/// let scout = Unit::new("p0", Team::Player, Position::new(7, 10), Facing::Up, UnitStats::default());
/// let vis = compute_visibility(&[scout], &TileMask::filled(false));
/// assert_eq!(vis.fog.get(Position::new(7, 10)), Some(false));
/// assert_eq!(vis.fog.get(Position::new(7, 3)), Some(false)); // far end of the cone
/// assert_eq!(vis.fog.get(Position::new(7, 17)), Some(true)); // behind, out of radius
/// ```
pub fn compute_visibility(units: &[Unit], previous_visited: &TileMask) -> Visibility {
    let mut fog = TileMask::filled(true);
    let mut visited = previous_visited.clone();

    let radius = SIGHT_RADIUS.floor() as i32;
    let observers = units
        .iter()
        .filter(|unit| unit.team == Team::Player && unit.is_alive());

    for unit in observers {
        let origin = unit.position;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let pos = Position::new(origin.x + dx, origin.y + dy);
                if pos.in_bounds() && origin.euclidean_distance(pos) <= SIGHT_RADIUS {
                    fog.set(pos, false);
                    visited.set(pos, true);
                }
            }
        }

        for pos in cone_tiles(origin, unit.facing) {
            fog.set(pos, false);
            visited.set(pos, true);
        }
    }

    Visibility { fog, visited }
}

/// In-bounds tiles of the directional sight cone ahead of `origin`.
fn cone_tiles(origin: Position, facing: Facing) -> impl Iterator<Item = Position> {
    let ahead = facing.to_delta();
    let across = Position::new(ahead.y.abs(), ahead.x.abs());
    (1..=CONE_DEPTH)
        .flat_map(move |i| (-i..=i).map(move |j| (i, j)))
        .map(move |(i, j)| {
            Position::new(
                origin.x + ahead.x * i + across.x * j,
                origin.y + ahead.y * i + across.y * j,
            )
        })
        .filter(|pos| pos.in_bounds())
}
