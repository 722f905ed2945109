//! # Opponent Controller
//!
//! The scripted side's turn, broken into discrete steps.
//!
//! Each call to [`run_opponent_step`] performs at most one unit action so a host
//! can pace presentation between steps. Progress through the turn lives in
//! [`GameState::opponent_turn`], which keeps every step a pure function of the
//! state it is given.

use crate::game::actions::{pass_control, relocate, resolve_attack};
use crate::game::{can_attack, ActionError, GameState, Position, Unit, UnitId};
use crate::utils::{can_move_to, find_next_step_towards};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Seed offset applied per turn so each turn shuffles differently.
const TURN_SEED_STRIDE: u64 = 1000;

/// Progress through a scripted turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentTurn {
    /// Acting order, shuffled once at the start of the turn
    pub order: Vec<UnitId>,
    /// Index into `order` of the unit currently acting
    pub cursor: usize,
    /// Actions taken so far by the current unit
    pub steps_taken: u32,
}

impl OpponentTurn {
    /// Shuffles the acting team's living units with the per-turn seed.
    fn begin(state: &GameState) -> Self {
        let mut order: Vec<UnitId> = state
            .living_units(state.turn)
            .map(|unit| unit.id.clone())
            .collect();
        let mut rng = StdRng::seed_from_u64(turn_seed(state.rng_seed, state.turn_number));
        order.shuffle(&mut rng);

        debug!("Opponent order for turn {}: {:?}", state.turn_number, order);
        Self {
            order,
            cursor: 0,
            steps_taken: 0,
        }
    }

    fn current(&self) -> Option<&UnitId> {
        self.order.get(self.cursor)
    }

    fn advance(&mut self) {
        self.cursor += 1;
        self.steps_taken = 0;
    }
}

/// Derives the shuffle seed for one turn from the match seed.
pub fn turn_seed(match_seed: u64, turn_number: u32) -> u64 {
    match_seed.wrapping_add(u64::from(turn_number).wrapping_mul(TURN_SEED_STRIDE))
}

enum Decision {
    Attack(UnitId),
    Advance(Position),
    Hold,
}

/// Attack the first attackable opposing unit, otherwise step toward the first
/// opposing unit in list order. Neither choice is optimised.
fn decide(state: &GameState, unit: &Unit) -> Decision {
    let cover = state.standing_obstacles();
    let opposing: Vec<&Unit> = state.living_units(unit.team.opponent()).collect();

    if let Some(target) = opposing
        .iter()
        .find(|target| can_attack(unit, target, &cover))
    {
        return Decision::Attack(target.id.clone());
    }

    let Some(quarry) = opposing.first() else {
        return Decision::Hold;
    };
    match find_next_step_towards(state, unit, quarry.position) {
        Some(step) if can_move_to(state, unit, step) => Decision::Advance(step),
        _ => Decision::Hold,
    }
}

/// Performs the next increment of the scripted turn.
///
/// Units that are down, out of action points, or unable to attack or move are
/// skipped. Once every unit has acted the turn passes back to the player side
/// and the turn counter advances. Rejected once the match is over, which lets
/// a host abort a running turn by checking before each call.
pub fn run_opponent_step(state: &GameState) -> Result<GameState, ActionError> {
    if state.is_over() {
        return Err(ActionError::GameOver);
    }
    if !state.is_ai_turn {
        return Err(ActionError::NotScriptedTurn);
    }

    let mut progress = state
        .opponent_turn
        .clone()
        .unwrap_or_else(|| OpponentTurn::begin(state));

    while let Some(unit_id) = progress.current().cloned() {
        let ready = state.unit(&unit_id).filter(|unit| {
            unit.is_alive() && unit.ap > 0 && progress.steps_taken < unit.max_ap
        });
        let Some(unit) = ready else {
            progress.advance();
            continue;
        };

        let mut next = match decide(state, unit) {
            Decision::Attack(target_id) => resolve_attack(state, &unit_id, &target_id)?,
            Decision::Advance(step) => relocate(state, &unit_id, &[step]),
            Decision::Hold => {
                debug!("{unit_id} holds position");
                progress.advance();
                continue;
            }
        };
        progress.steps_taken += 1;
        next.opponent_turn = Some(progress);
        return Ok(next);
    }

    Ok(pass_control(state))
}

/// Runs scripted steps until control returns to the player or the match ends.
pub fn run_opponent_turn(state: &GameState) -> Result<GameState, ActionError> {
    let mut current = run_opponent_step(state)?;
    while current.is_ai_turn && !current.is_over() {
        current = run_opponent_step(&current)?;
    }
    Ok(current)
}
