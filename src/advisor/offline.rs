//! # Offline Advisor
//!
//! A rule-based advisor that needs no external service.

use crate::advisor::{Briefing, TacticalAdvisor};
use crate::game::{can_attack, GameState, Team};
use crate::GridbreachResult;

/// Health at or below which a unit is told to fall back.
const CRITICAL_HEALTH: u32 = 1;

/// Suggests the first available shot, otherwise a cautious advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdvisor;

impl TacticalAdvisor for OfflineAdvisor {
    fn advise(&self, state: &GameState) -> GridbreachResult<String> {
        if state.is_over() {
            return Ok(match state.winner() {
                Some(Team::Player) => "Area secured. Regroup for extraction.".to_string(),
                _ => String::new(),
            });
        }

        let cover = state.standing_obstacles();
        for shooter in state.living_units(Team::Player).filter(|unit| unit.ap > 0) {
            let target = state
                .living_units(Team::Enemy)
                .filter(|enemy| state.is_visible(enemy.position))
                .find(|enemy| can_attack(shooter, enemy, &cover));
            if let Some(target) = target {
                return Ok(format!(
                    "{} has a clear shot on the hostile at {}; take it.",
                    shooter.id, target.position
                ));
            }
        }

        if let Some(wounded) = state
            .living_units(Team::Player)
            .find(|unit| unit.hp <= CRITICAL_HEALTH)
        {
            return Ok(format!("Pull {} back behind cover before it is lost.", wounded.id));
        }

        let briefing = Briefing::from_state(state);
        Ok(match briefing.visible_enemies.first() {
            Some(contact) => format!(
                "Contact at {}. Close the distance using cover.",
                contact.position
            ),
            None => "No contacts. Advance in pairs and keep the cone forward.".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Facing, Position, Unit, UnitStats};

    fn unit(id: &str, team: Team, x: i32, y: i32) -> Unit {
        Unit::new(id, team, Position::new(x, y), Facing::Up, UnitStats::default())
    }

    #[test]
    fn test_calls_out_shot() {
        let state = GameState::new(
            vec![unit("p0", Team::Player, 3, 10), unit("e0", Team::Enemy, 3, 7)],
            vec![],
            1,
        );
        let advice = OfflineAdvisor.advise(&state).unwrap();
        assert!(advice.starts_with("p0 has a clear shot"));
    }

    #[test]
    fn test_no_contacts() {
        let state = GameState::new(
            vec![unit("p0", Team::Player, 3, 18), unit("e0", Team::Enemy, 3, 1)],
            vec![],
            1,
        );
        let advice = OfflineAdvisor.advise(&state).unwrap();
        assert!(advice.starts_with("No contacts"));
    }

    #[test]
    fn test_wounded_unit_pulled_back() {
        let mut state = GameState::new(
            vec![unit("p0", Team::Player, 3, 18), unit("e0", Team::Enemy, 3, 1)],
            vec![],
            1,
        );
        state.unit_mut("p0").unwrap().hp = 1;
        let advice = OfflineAdvisor.advise(&state).unwrap();
        assert!(advice.contains("Pull p0 back"));
    }
}
