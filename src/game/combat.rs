//! # Combat
//!
//! Attack legality and targeting queries.
//!
//! Every shot deals exactly one point of damage; there is no variance.

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::game::{Facing, GameState, Position, Unit};
use crate::utils::{distance, line_of_sight_clear};
use serde::{Deserialize, Serialize};

/// Whether `attacker` may shoot `target` given the blocking cover.
///
/// Same-team targets are never attackable. Otherwise the target must be within
/// the attacker's Manhattan range with a clear line of sight.
pub fn can_attack(attacker: &Unit, target: &Unit, obstacles: &[Position]) -> bool {
    if attacker.team == target.team {
        return false;
    }
    in_range_with_sight(attacker, target.position, obstacles)
}

/// Range and line-of-sight check against an arbitrary tile.
pub fn in_range_with_sight(attacker: &Unit, tile: Position, obstacles: &[Position]) -> bool {
    distance(attacker.position, tile) <= attacker.range
        && line_of_sight_clear(attacker.position, tile, obstacles)
}

/// Whether `tile` lies in the 90° wedge ahead of the unit's facing.
pub fn is_in_fire_sector(unit: &Unit, tile: Position) -> bool {
    let delta = tile - unit.position;
    let (dx, dy) = (delta.x, delta.y);
    if dx == 0 && dy == 0 {
        return false;
    }
    match unit.facing {
        Facing::Up => dy < 0 && dx.abs() <= dy.abs(),
        Facing::Down => dy > 0 && dx.abs() <= dy.abs(),
        Facing::Left => dx < 0 && dy.abs() <= dx.abs(),
        Facing::Right => dx > 0 && dy.abs() <= dx.abs(),
    }
}

/// Which tiles a sights query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SightsMode {
    /// Only the wedge ahead of the unit's facing
    Sector,
    /// Every direction
    Full,
}

/// Tiles the unit could currently fire on.
///
/// A tile qualifies when it is 1 to `range` steps away, visible to the player
/// side this turn, has a clear line of sight, and (for [`SightsMode::Sector`])
/// lies inside the unit's fire sector. Down or unknown units yield nothing.
pub fn targetable_tiles(state: &GameState, unit_id: &str, mode: SightsMode) -> Vec<Position> {
    let Some(unit) = state.unit(unit_id).filter(|unit| unit.is_alive()) else {
        return Vec::new();
    };
    let obstacles = state.standing_obstacles();
    // No tile on the grid is further than width + height steps away
    let reach = unit.range.min((GRID_WIDTH + GRID_HEIGHT) as u32) as i32;

    let mut tiles = Vec::new();
    for y in (unit.position.y - reach)..=(unit.position.y + reach) {
        for x in (unit.position.x - reach)..=(unit.position.x + reach) {
            let tile = Position::new(x, y);
            let dist = distance(unit.position, tile);
            if dist == 0 || dist > unit.range || !state.is_visible(tile) {
                continue;
            }
            if mode == SightsMode::Sector && !is_in_fire_sector(unit, tile) {
                continue;
            }
            if line_of_sight_clear(unit.position, tile, &obstacles) {
                tiles.push(tile);
            }
        }
    }
    tiles
}
