//! # Battle Records
//!
//! A named, timestamped sequence of states kept for replay and export.

use crate::game::GameState;
use crate::{GridbreachError, GridbreachResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// How a recorded battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleOutcome {
    Win,
    Loss,
    InProgress,
}

impl BattleOutcome {
    /// Outcome from the player side's point of view.
    pub fn of(state: &GameState) -> Self {
        if state.player_wins() {
            BattleOutcome::Win
        } else if state.enemy_wins() {
            BattleOutcome::Loss
        } else {
            BattleOutcome::InProgress
        }
    }
}

/// Every state a battle passed through, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub id: String,
    /// Operation name such as `OP-417`
    pub name: String,
    /// Milliseconds since the Unix epoch when the record was made
    pub timestamp: u64,
    pub history: Vec<GameState>,
    pub result: BattleOutcome,
}

impl BattleRecord {
    /// Creates a record from a state history.
    ///
    /// The operation name is derived from the first state's match seed, so a
    /// replayed match keeps its name.
    pub fn new(history: Vec<GameState>) -> GridbreachResult<Self> {
        let first = history.first().ok_or_else(|| {
            GridbreachError::InvalidState("battle record needs at least one state".to_string())
        })?;
        let operation = StdRng::seed_from_u64(first.rng_seed).gen_range(100..1000);
        let result = history.last().map_or(BattleOutcome::InProgress, BattleOutcome::of);

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: format!("OP-{operation}"),
            timestamp: unix_millis(),
            history,
            result,
        })
    }

    pub fn final_state(&self) -> Option<&GameState> {
        self.history.last()
    }

    pub fn to_json(&self) -> GridbreachResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a record, validating every contained state.
    pub fn from_json(json: &str) -> GridbreachResult<Self> {
        let record: BattleRecord = serde_json::from_str(json)?;
        if record.history.is_empty() {
            return Err(GridbreachError::InvalidState(format!(
                "battle record {} has no states",
                record.id
            )));
        }
        for (index, state) in record.history.iter().enumerate() {
            state.validate().map_err(|error| {
                GridbreachError::InvalidState(format!("state {index} of {}: {error}", record.name))
            })?;
        }
        Ok(record)
    }

    /// Writes the record as pretty JSON.
    pub fn save_to_file(&self, path: &Path) -> GridbreachResult<()> {
        fs::write(path, self.to_json()?)?;
        log::info!("Saved battle record {} to {}", self.name, path.display());
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> GridbreachResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Facing, Position, Team, Unit, UnitStats};

    fn skirmish() -> GameState {
        let units = vec![
            Unit::new("p0", Team::Player, Position::new(3, 18), Facing::Up, UnitStats::default()),
            Unit::new("e0", Team::Enemy, Position::new(3, 1), Facing::Down, UnitStats::default()),
        ];
        GameState::new(units, vec![(Position::new(5, 5), 2)], 77)
    }

    #[test]
    fn test_outcome_follows_last_state() {
        let start = skirmish();
        let mut won = start.clone();
        won.unit_mut("e0").unwrap().hp = 0;

        let record = BattleRecord::new(vec![start.clone(), won]).unwrap();
        assert_eq!(record.result, BattleOutcome::Win);

        let record = BattleRecord::new(vec![start]).unwrap();
        assert_eq!(record.result, BattleOutcome::InProgress);
    }

    #[test]
    fn test_name_format() {
        let record = BattleRecord::new(vec![skirmish()]).unwrap();
        let number: u32 = record.name.strip_prefix("OP-").unwrap().parse().unwrap();
        assert!((100..1000).contains(&number));
        assert_eq!(record.name, BattleRecord::new(vec![skirmish()]).unwrap().name);
    }

    #[test]
    fn test_empty_history_rejected() {
        assert!(BattleRecord::new(vec![]).is_err());
    }

    #[test]
    fn test_json_uses_result_labels() {
        let record = BattleRecord::new(vec![skirmish()]).unwrap();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"IN_PROGRESS\""));
        assert_eq!(BattleRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_corrupt_state_rejected() {
        let mut broken = skirmish();
        broken.units[1].id = "p0".to_string();
        let mut record = BattleRecord::new(vec![skirmish()]).unwrap();
        record.history.push(broken);

        let json = serde_json::to_string(&record).unwrap();
        assert!(matches!(
            BattleRecord::from_json(&json),
            Err(GridbreachError::InvalidState(_))
        ));
    }
}
