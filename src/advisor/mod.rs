//! # Advisor Module
//!
//! Boundary to the optional tactical advisory service.
//!
//! Advice is never on the critical path: [`advise_or_fallback`] turns every
//! failure into a fixed line so gameplay is unaffected.

pub mod offline;
pub mod traits;

pub use offline::*;
pub use traits::*;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::game::{GameState, Position, Team, Unit, UnitId};
use log::warn;
use serde::{Deserialize, Serialize};

/// Returned when an advisor answers with nothing.
pub const EMPTY_ADVICE_FALLBACK: &str = "Eyes on the target. Stay sharp.";

/// Returned when an advisor fails.
pub const ADVISOR_ERROR_FALLBACK: &str =
    "Tactical link unstable. Maintain formation and engage hostiles.";

/// What the player side knows about one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    pub id: UnitId,
    pub position: Position,
    pub hp: u32,
    pub max_hp: u32,
    pub ap: u32,
}

impl UnitReport {
    fn of(unit: &Unit) -> Self {
        Self {
            id: unit.id.clone(),
            position: unit.position,
            hp: unit.hp,
            max_hp: unit.max_hp,
            ap: unit.ap,
        }
    }
}

/// The player side's view of the battlefield, with hidden enemies left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Briefing {
    pub turn: Team,
    pub turn_number: u32,
    pub squad: Vec<UnitReport>,
    pub visible_enemies: Vec<UnitReport>,
    pub cover_count: usize,
}

impl Briefing {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            turn: state.turn,
            turn_number: state.turn_number,
            squad: state.living_units(Team::Player).map(UnitReport::of).collect(),
            visible_enemies: state
                .living_units(Team::Enemy)
                .filter(|unit| state.is_visible(unit.position))
                .map(UnitReport::of)
                .collect(),
            cover_count: state.standing_obstacles().len(),
        }
    }

    /// Renders the briefing as a prompt for a text-generation service.
    pub fn prompt(&self) -> String {
        let squad = self
            .squad
            .iter()
            .map(|unit| {
                format!(
                    "[ID:{}, POS:{}, HP:{}/{}, AP:{}]",
                    unit.id, unit.position, unit.hp, unit.max_hp, unit.ap
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let enemies = self
            .visible_enemies
            .iter()
            .map(|unit| format!("[POS:{}, HP:{}]", unit.position, unit.hp))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Act as a tactical advisor for a turn-based grid game ({GRID_WIDTH}x{GRID_HEIGHT}).\n\
             Current turn: {} ({})\n\
             Player units: {squad}\n\
             Visible enemies: {enemies}\n\
             Cover tiles standing: {}\n\
             The goal is to eliminate all enemies.\n\
             Give a one-sentence, sharp tactical suggestion for the current turn.",
            self.turn, self.turn_number, self.cover_count
        )
    }
}

/// Asks `advisor` for a suggestion, substituting a fixed line on failure.
pub fn advise_or_fallback(advisor: &dyn TacticalAdvisor, state: &GameState) -> String {
    match advisor.advise(state) {
        Ok(text) if text.trim().is_empty() => EMPTY_ADVICE_FALLBACK.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(error) => {
            warn!("Advisor {} failed: {}", advisor.name(), error);
            ADVISOR_ERROR_FALLBACK.to_string()
        }
    }
}
