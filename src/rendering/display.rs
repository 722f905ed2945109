//! # Board Display
//!
//! Character-grid rendering of the battlefield from the player side's view.

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::game::{GameState, Position, Team};

/// Glyphs used by [`render_board`].
pub mod glyphs {
    pub const UNEXPLORED: char = '~';
    pub const REMEMBERED: char = ',';
    pub const OPEN: char = '.';
    pub const COVER: char = '#';
    pub const RUBBLE: char = '%';
    pub const PLAYER: char = 'P';
    pub const ENEMY: char = 'E';
    pub const DOWN: char = 'x';
}

/// Glyph for one tile as the player side sees it.
///
/// Enemies are drawn only on tiles visible this turn. Cover is drawn wherever
/// the tile has been seen at least once.
pub fn tile_glyph(state: &GameState, pos: Position) -> char {
    let visible = state.is_visible(pos);
    let seen = state.visited_tiles.get(pos).unwrap_or(false);

    if let Some(unit) = state.living_unit_at(pos) {
        match unit.team {
            Team::Player => return glyphs::PLAYER,
            Team::Enemy if visible => return glyphs::ENEMY,
            Team::Enemy => {}
        }
    } else if visible && state.units.iter().any(|unit| unit.position == pos) {
        return glyphs::DOWN;
    }

    if seen && state.obstacles.contains(&pos) {
        return if state.is_obstacle_standing(pos) {
            glyphs::COVER
        } else {
            glyphs::RUBBLE
        };
    }

    match (visible, seen) {
        (true, _) => glyphs::OPEN,
        (false, true) => glyphs::REMEMBERED,
        (false, false) => glyphs::UNEXPLORED,
    }
}

/// Renders the whole grid with column and row labels.
///
/// # Examples
///
/// ```
/// use gridbreach::{create_initial_mission, render_board, MissionConfig};
///
/// let state = create_initial_mission(&MissionConfig::for_testing(1)).unwrap();
/// let board = render_board(&state);
/// assert_eq!(board.lines().count(), 21);
/// ```
pub fn render_board(state: &GameState) -> String {
    let mut out = String::from("   ");
    for x in 0..GRID_WIDTH {
        out.push(char::from_digit((x % 10) as u32, 10).unwrap_or(' '));
    }
    out.push('\n');

    for y in 0..GRID_HEIGHT {
        out.push_str(&format!("{y:>2} "));
        for x in 0..GRID_WIDTH {
            out.push(tile_glyph(state, Position::new(x, y)));
        }
        out.push('\n');
    }
    out
}
