//! # Action System
//!
//! Every state-mutating operation in the engine.
//!
//! Each operation borrows the current state, validates the intent against the
//! rules, and either rejects it with an [`ActionError`] or returns a new
//! state. Nothing is mutated before validation finishes, so a rejection never
//! leaves partial changes behind.
//!
//! The `apply_*` functions and [`end_turn`] are the host-facing entry points
//! and refuse to run while the scripted side is acting. The scripted side
//! drives the same rules through [`crate::game::run_opponent_step`].

use crate::game::{Facing, GameState, Position, SpecialKind, Team, Unit, UnitId};
use crate::utils::{distance, find_path, line_of_sight_clear};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Why an action was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("the match is over")]
    GameOver,

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("unit {0} is down")]
    UnitDown(UnitId),

    #[error("unit {unit_id} cannot act during the {acting} turn")]
    NotYourTurn { unit_id: UnitId, acting: Team },

    #[error("the scripted side is acting")]
    ScriptedTurn,

    #[error("the scripted side is not acting")]
    NotScriptedTurn,

    #[error("{0} is off the grid")]
    OutOfBounds(Position),

    #[error("unit {0} has no action points left")]
    NoActionPoints(UnitId),

    #[error("no route to {0}")]
    NoPath(Position),

    #[error("route needs {needed} action points but only {available} remain")]
    PathTooLong { needed: u32, available: u32 },

    #[error("cannot fire on a unit of the same team")]
    SameTeam,

    #[error("target {0} is already down")]
    TargetDown(UnitId),

    #[error("{0} is out of range")]
    OutOfRange(Position),

    #[error("line of sight to {0} is blocked")]
    LineOfSightBlocked(Position),

    #[error("unit {unit_id} has no {charge} charges left")]
    NoCharges { unit_id: UnitId, charge: String },

    #[error("no cover at {0}")]
    NoObstacle(Position),

    #[error("cover at {0} is already cleared")]
    AlreadyCleared(Position),
}

/// A serializable description of one state transition.
///
/// Hosts can log these and replay a match by folding them over the initial
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Select { unit_id: UnitId },
    Move { unit_id: UnitId, target: Position },
    Rotate { unit_id: UnitId, facing: Facing },
    AttackUnit { attacker_id: UnitId, target_id: UnitId },
    AttackObstacle { attacker_id: UnitId, position: Position },
    Special { unit_id: UnitId, kind: SpecialKind },
    EndTurn,
    OpponentStep,
}

impl Action {
    /// Applies the action to `state`, producing the next state.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridbreach::{Action, Facing, GameState, Position, Team, Unit, UnitStats};
    ///
    /// let scout = Unit::new("p0", Team::Player, Position::new(3, 18), Facing::Up, UnitStats::default());
    /// let state = GameState::new(vec![scout], vec![], 1);
    ///
    /// let step = Action::Move { unit_id: "p0".to_string(), target: Position::new(3, 16) };
    /// let next = step.apply(&state).unwrap();
    /// assert_eq!(next.unit("p0").unwrap().ap, 1);
    /// assert_eq!(state.unit("p0").unwrap().ap, 3);
    /// ```
    pub fn apply(&self, state: &GameState) -> Result<GameState, ActionError> {
        let result = match self {
            Action::Select { unit_id } => apply_select(state, unit_id),
            Action::Move { unit_id, target } => apply_move(state, unit_id, *target),
            Action::Rotate { unit_id, facing } => apply_rotate(state, unit_id, *facing),
            Action::AttackUnit {
                attacker_id,
                target_id,
            } => apply_attack_unit(state, attacker_id, target_id),
            Action::AttackObstacle {
                attacker_id,
                position,
            } => apply_attack_obstacle(state, attacker_id, *position),
            Action::Special { unit_id, kind } => apply_special_action(state, unit_id, *kind),
            Action::EndTurn => end_turn(state),
            Action::OpponentStep => crate::game::run_opponent_step(state),
        };

        if let Err(error) = &result {
            debug!("Rejected {:?}: {}", self, error);
        }
        result
    }
}

/// Refuses host actions while the scripted side is acting.
fn ensure_host_turn(state: &GameState) -> Result<(), ActionError> {
    if state.is_over() {
        return Err(ActionError::GameOver);
    }
    if state.is_ai_turn {
        return Err(ActionError::ScriptedTurn);
    }
    Ok(())
}

/// Looks up a unit that is alive and belongs to the acting team.
pub(crate) fn acting_unit<'a>(state: &'a GameState, unit_id: &str) -> Result<&'a Unit, ActionError> {
    if state.is_over() {
        return Err(ActionError::GameOver);
    }
    let unit = state
        .unit(unit_id)
        .ok_or_else(|| ActionError::UnknownUnit(unit_id.to_string()))?;
    if !unit.is_alive() {
        return Err(ActionError::UnitDown(unit.id.clone()));
    }
    if unit.team != state.turn {
        return Err(ActionError::NotYourTurn {
            unit_id: unit.id.clone(),
            acting: state.turn,
        });
    }
    Ok(unit)
}

/// Marks a unit of the acting team as selected.
pub fn apply_select(state: &GameState, unit_id: &str) -> Result<GameState, ActionError> {
    ensure_host_turn(state)?;
    let unit = acting_unit(state, unit_id)?;

    debug!("Selected {}", unit.id);
    let mut next = state.clone();
    next.selected_unit_id = Some(unit.id.clone());
    Ok(next)
}

/// Moves a unit along the shortest route to `target`.
///
/// Costs one action point per step. The unit ends facing the direction of its
/// final step and fog is recomputed.
pub fn apply_move(
    state: &GameState,
    unit_id: &str,
    target: Position,
) -> Result<GameState, ActionError> {
    ensure_host_turn(state)?;
    let unit = acting_unit(state, unit_id)?;

    if !target.in_bounds() {
        return Err(ActionError::OutOfBounds(target));
    }
    if unit.ap == 0 {
        return Err(ActionError::NoActionPoints(unit.id.clone()));
    }

    let path = find_path(state, unit, target)
        .filter(|path| !path.is_empty())
        .ok_or(ActionError::NoPath(target))?;
    let needed = path.len() as u32;
    if needed > unit.ap {
        return Err(ActionError::PathTooLong {
            needed,
            available: unit.ap,
        });
    }

    Ok(relocate(state, unit_id, &path))
}

/// Walks a validated route and returns the resulting state.
pub(crate) fn relocate(state: &GameState, unit_id: &str, path: &[Position]) -> GameState {
    let mut next = state.clone();
    let Some(&last) = path.last() else {
        return next;
    };
    if let Some(unit) = next.unit_mut(unit_id) {
        let previous = path
            .len()
            .checked_sub(2)
            .and_then(|i| path.get(i).copied())
            .unwrap_or(unit.position);
        if let Some(facing) = Facing::from_step(last - previous) {
            unit.facing = facing;
        }
        unit.position = last;
        unit.spend_ap(path.len() as u32);
        debug!("{} moved to {} ({} AP left)", unit.id, last, unit.ap);
    }
    next.refresh_visibility();
    next.record(format!("{unit_id} moved to {last}"));
    next
}

/// Turns a unit to face a new direction. Costs no action points.
pub fn apply_rotate(
    state: &GameState,
    unit_id: &str,
    facing: Facing,
) -> Result<GameState, ActionError> {
    ensure_host_turn(state)?;
    acting_unit(state, unit_id)?;

    let mut next = state.clone();
    if let Some(unit) = next.unit_mut(unit_id) {
        unit.facing = facing;
    }
    next.refresh_visibility();
    debug!("{unit_id} turned {facing}");
    next.record(format!("{unit_id} turned {facing}"));
    Ok(next)
}

/// Fires one shot at an enemy unit.
///
/// Costs one action point and removes one point of health, floored at zero.
/// A unit brought to zero stays in the state as down.
pub fn apply_attack_unit(
    state: &GameState,
    attacker_id: &str,
    target_id: &str,
) -> Result<GameState, ActionError> {
    ensure_host_turn(state)?;
    resolve_attack(state, attacker_id, target_id)
}

/// Shared attack rules for the host and the scripted side.
pub(crate) fn resolve_attack(
    state: &GameState,
    attacker_id: &str,
    target_id: &str,
) -> Result<GameState, ActionError> {
    let attacker = acting_unit(state, attacker_id)?;
    if attacker.ap == 0 {
        return Err(ActionError::NoActionPoints(attacker.id.clone()));
    }

    let target = state
        .unit(target_id)
        .ok_or_else(|| ActionError::UnknownUnit(target_id.to_string()))?;
    if target.team == attacker.team {
        return Err(ActionError::SameTeam);
    }
    if !target.is_alive() {
        return Err(ActionError::TargetDown(target.id.clone()));
    }
    if distance(attacker.position, target.position) > attacker.range {
        return Err(ActionError::OutOfRange(target.position));
    }
    if !line_of_sight_clear(attacker.position, target.position, &state.standing_obstacles()) {
        return Err(ActionError::LineOfSightBlocked(target.position));
    }

    let mut next = state.clone();
    if let Some(target) = next.unit_mut(target_id) {
        target.take_hit();
    }
    if let Some(attacker) = next.unit_mut(attacker_id) {
        attacker.spend_ap(1);
    }
    next.refresh_visibility();

    let remaining = next.unit(target_id).map_or(0, |unit| unit.hp);
    debug!("{attacker_id} hit {target_id}, {remaining} hp left");
    if remaining == 0 {
        next.record(format!("{attacker_id} took down {target_id}"));
    } else {
        next.record(format!("{attacker_id} hit {target_id}"));
    }
    Ok(next)
}

/// Throws a grenade at a cover tile.
///
/// Needs one action point and one grenade, both consumed. The cover loses one
/// point of structural health; at zero it stops blocking and waits for the
/// host to prune it.
pub fn apply_attack_obstacle(
    state: &GameState,
    attacker_id: &str,
    position: Position,
) -> Result<GameState, ActionError> {
    ensure_host_turn(state)?;
    let attacker = acting_unit(state, attacker_id)?;

    if !position.in_bounds() {
        return Err(ActionError::OutOfBounds(position));
    }
    if attacker.ap == 0 {
        return Err(ActionError::NoActionPoints(attacker.id.clone()));
    }
    if attacker.inventory.grenades == 0 {
        return Err(ActionError::NoCharges {
            unit_id: attacker.id.clone(),
            charge: "grenade".to_string(),
        });
    }
    if !state.obstacles.contains(&position) {
        return Err(ActionError::NoObstacle(position));
    }
    if state.obstacle_health(position).unwrap_or(0) == 0 {
        return Err(ActionError::AlreadyCleared(position));
    }
    if distance(attacker.position, position) > attacker.range {
        return Err(ActionError::OutOfRange(position));
    }
    if !line_of_sight_clear(attacker.position, position, &state.standing_obstacles()) {
        return Err(ActionError::LineOfSightBlocked(position));
    }

    let mut next = state.clone();
    if let Some(attacker) = next.unit_mut(attacker_id) {
        attacker.spend_ap(1);
        attacker.inventory.consume_grenade();
    }
    let health = next.obstacle_hp.entry(position).or_insert(0);
    *health = health.saturating_sub(1);
    let remaining = *health;

    debug!("{attacker_id} blasted cover at {position}, {remaining} left");
    if remaining == 0 {
        next.record(format!("{attacker_id} cleared cover at {position}"));
    } else {
        next.record(format!("{attacker_id} damaged cover at {position}"));
    }
    Ok(next)
}

/// Spends one charge of a special action.
///
/// Placement, stealth and trap effects are not modelled; the only state change
/// is the spent charge.
pub fn apply_special_action(
    state: &GameState,
    unit_id: &str,
    kind: SpecialKind,
) -> Result<GameState, ActionError> {
    ensure_host_turn(state)?;
    let unit = acting_unit(state, unit_id)?;

    if unit.inventory.charges(kind) == 0 {
        return Err(ActionError::NoCharges {
            unit_id: unit.id.clone(),
            charge: kind.to_string(),
        });
    }

    let mut next = state.clone();
    if let Some(unit) = next.unit_mut(unit_id) {
        unit.inventory.consume(kind);
    }
    debug!("{unit_id} used {kind}");
    next.record(format!("{unit_id} used {kind}"));
    Ok(next)
}

/// Ends the player's turn and hands control to the scripted side.
pub fn end_turn(state: &GameState) -> Result<GameState, ActionError> {
    ensure_host_turn(state)?;
    Ok(pass_control(state))
}

/// Flips the acting team, refilling every unit's action points.
///
/// Control returning to the player side starts a new turn number.
pub(crate) fn pass_control(state: &GameState) -> GameState {
    let mut next = state.clone();
    let incoming = state.turn.opponent();

    next.turn = incoming;
    next.is_ai_turn = incoming == Team::Enemy;
    next.selected_unit_id = None;
    next.opponent_turn = None;
    if incoming == Team::Player {
        next.turn_number += 1;
    }
    for unit in &mut next.units {
        unit.refill_ap();
    }

    info!("Turn {}: {} side acting", next.turn_number, incoming);
    next.record(format!("Turn {}: {} side acting", next.turn_number, incoming));
    next
}
