//! # User Interface Elements
//!
//! Roster and message panels printed beside the board.

use crate::game::{GameState, Team};

/// Number of history lines shown by [`render_messages`].
pub const MESSAGE_LINES: usize = 5;

/// One line per player unit, plus a header with the turn.
pub fn render_roster(state: &GameState) -> String {
    let mut out = format!("Turn {} - {} acting\n", state.turn_number, state.turn);
    for unit in state.units.iter().filter(|unit| unit.team == Team::Player) {
        let status = if unit.is_alive() { "" } else { " DOWN" };
        let marker = if state.selected_unit_id.as_deref() == Some(unit.id.as_str()) {
            '>'
        } else {
            ' '
        };
        out.push_str(&format!(
            "{marker}{:<3} {} HP {}/{} AP {}/{} G{}{status}\n",
            unit.id,
            unit.position,
            unit.hp,
            unit.max_hp,
            unit.ap,
            unit.max_ap,
            unit.inventory.grenades,
        ));
    }
    out
}

/// The most recent history lines, oldest first.
pub fn render_messages(state: &GameState) -> String {
    let start = state.history.len().saturating_sub(MESSAGE_LINES);
    state.history[start..]
        .iter()
        .map(|line| format!("> {line}\n"))
        .collect()
}
