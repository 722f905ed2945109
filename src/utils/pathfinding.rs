//! # Pathfinding
//!
//! Movement legality and breadth-first search over the 4-connected grid.
//!
//! Standing cover and tiles held by other living units are impassable.
//! Neighbours are expanded right, left, down, up; among equally short routes
//! the one returned follows from that order and is not otherwise guaranteed.

use crate::game::{GameState, Position, Unit};
use crate::utils::distance;
use ::pathfinding::prelude::bfs;

/// Whether `mover` may enter `pos` during a search.
fn is_passable(state: &GameState, mover: &Unit, pos: Position) -> bool {
    pos.in_bounds()
        && !state.is_obstacle_standing(pos)
        && !state
            .units
            .iter()
            .any(|other| other.id != mover.id && other.is_alive() && other.position == pos)
}

fn passable_neighbours(state: &GameState, mover: &Unit, pos: Position) -> Vec<Position> {
    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(|&next| is_passable(state, mover, next))
        .collect()
}

/// Single-step legality: `target` must be in bounds, exactly one Manhattan
/// step away, free of standing cover, and not held by another living unit.
pub fn can_move_to(state: &GameState, unit: &Unit, target: Position) -> bool {
    distance(unit.position, target) == 1 && is_passable(state, unit, target)
}

/// Shortest route from the unit to `target`, excluding the starting tile.
///
/// Returns `None` when the target is unreachable. A target equal to the
/// unit's own tile yields an empty route.
///
/// # Examples
///
/// ```
/// use gridbreach::{find_path, Facing, GameState, Position, Team, Unit, UnitStats};
///
/// let unit = Unit::new("p0", Team::Player, Position::new(0, 0), Facing::Down, UnitStats::default());
/// let state = GameState::new(vec![unit.clone()], vec![(Position::new(1, 0), 2)], 1);
/// let path = find_path(&state, &unit, Position::new(2, 0)).unwrap();
/// assert_eq!(path.len(), 4); // around the cover
/// assert_eq!(path.last(), Some(&Position::new(2, 0)));
/// ```
pub fn find_path(state: &GameState, unit: &Unit, target: Position) -> Option<Vec<Position>> {
    let route = bfs(
        &unit.position,
        |&pos| passable_neighbours(state, unit, pos),
        |&pos| pos == target,
    )?;
    Some(route.into_iter().skip(1).collect())
}

/// First step of a shortest route that ends on any tile within one step of
/// `target`.
///
/// The target tile itself may be occupied. Returns `None` when the unit is
/// already adjacent or no such tile can be reached.
pub fn find_next_step_towards(
    state: &GameState,
    unit: &Unit,
    target: Position,
) -> Option<Position> {
    let route = bfs(
        &unit.position,
        |&pos| passable_neighbours(state, unit, pos),
        |&pos| distance(pos, target) <= 1,
    )?;
    route.get(1).copied()
}
