//! # Game State Module
//!
//! The complete, self-contained snapshot of a match.
//!
//! A `GameState` owns every piece of its data outright (no shared or
//! reference-counted substructures), so cloning one yields a fully independent
//! value. State transitions in [`crate::game::actions`] clone the input, mutate
//! the clone, and hand it back.

use crate::config::MISSION_START_MESSAGE;
use crate::game::{compute_visibility, OpponentTurn, Position, Team, TileMask, Unit, UnitId};
use crate::{GridbreachError, GridbreachResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Snapshot of a match at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Every unit, including down units not yet pruned by the host
    pub units: Vec<Unit>,
    /// Cover tiles, including cleared rubble not yet pruned by the host
    pub obstacles: Vec<Position>,
    /// Remaining structural health per cover tile, persisted keyed `"x,y"`
    #[serde(with = "obstacle_hp_keys")]
    pub obstacle_hp: BTreeMap<Position, u32>,
    pub selected_unit_id: Option<UnitId>,
    /// Team currently acting
    pub turn: Team,
    /// Full rounds played, starting at 1
    pub turn_number: u32,
    /// `true` means hidden right now
    pub fog_of_war: TileMask,
    /// `true` once any player unit has seen the tile; never reset
    pub visited_tiles: TileMask,
    /// Whether the acting side is the scripted opponent
    #[serde(rename = "isAITurn")]
    pub is_ai_turn: bool,
    /// Human-readable log of accepted actions
    #[serde(default)]
    pub history: Vec<String>,
    /// Match seed from which every random decision is derived
    #[serde(default)]
    pub rng_seed: u64,
    /// Progress through the scripted opponent's turn, if one is running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_turn: Option<OpponentTurn>,
}

impl GameState {
    /// Creates a state at the start of turn 1 with the player acting.
    ///
    /// Cover is given as `(position, health)` pairs. Fog is computed
    /// immediately from the player units.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridbreach::{Facing, GameState, Position, Team, Unit, UnitStats};
    ///
    /// let scout = Unit::new("p0", Team::Player, Position::new(3, 18), Facing::Up, UnitStats::default());
    /// let state = GameState::new(vec![scout], vec![(Position::new(5, 5), 2)], 7);
    /// assert_eq!(state.turn, Team::Player);
    /// assert_eq!(state.turn_number, 1);
    /// assert_eq!(state.obstacle_health(Position::new(5, 5)), Some(2));
    /// ```
    pub fn new(units: Vec<Unit>, cover: Vec<(Position, u32)>, seed: u64) -> Self {
        let obstacles = cover.iter().map(|&(pos, _)| pos).collect();
        let obstacle_hp = cover.into_iter().collect();

        let mut state = Self {
            units,
            obstacles,
            obstacle_hp,
            selected_unit_id: None,
            turn: Team::Player,
            turn_number: 1,
            fog_of_war: TileMask::filled(true),
            visited_tiles: TileMask::filled(false),
            is_ai_turn: false,
            history: vec![MISSION_START_MESSAGE.to_string()],
            rng_seed: seed,
            opponent_turn: None,
        };
        state.refresh_visibility();
        state
    }

    /// Looks up a unit by id.
    pub fn unit(&self, unit_id: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == unit_id)
    }

    /// Looks up a unit by id mutably.
    pub fn unit_mut(&mut self, unit_id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == unit_id)
    }

    /// Living units of one team, in state order.
    pub fn living_units(&self, team: Team) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |unit| unit.team == team && unit.is_alive())
    }

    /// The living unit standing on a tile, if any.
    pub fn living_unit_at(&self, pos: Position) -> Option<&Unit> {
        self.units
            .iter()
            .find(|unit| unit.position == pos && unit.is_alive())
    }

    /// Remaining health of the cover on a tile, if any is tracked there.
    pub fn obstacle_health(&self, pos: Position) -> Option<u32> {
        self.obstacle_hp.get(&pos).copied()
    }

    /// Whether a tile holds cover that still blocks movement and sight.
    ///
    /// Cover at zero health is rubble: it stays listed until the host prunes
    /// it, but no longer blocks anything.
    pub fn is_obstacle_standing(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos) && self.obstacle_health(pos).unwrap_or(0) > 0
    }

    /// Every cover tile that still blocks movement and sight.
    pub fn standing_obstacles(&self) -> Vec<Position> {
        self.obstacles
            .iter()
            .copied()
            .filter(|&pos| self.obstacle_health(pos).unwrap_or(0) > 0)
            .collect()
    }

    /// The team that has won, if the match is over.
    ///
    /// A team wins when the opposing team has no living units. Derived from
    /// the units every time, never stored.
    pub fn winner(&self) -> Option<Team> {
        if self.units.is_empty() {
            return None;
        }
        let players_alive = self.living_units(Team::Player).next().is_some();
        let enemies_alive = self.living_units(Team::Enemy).next().is_some();
        match (players_alive, enemies_alive) {
            (true, false) => Some(Team::Player),
            (false, true) => Some(Team::Enemy),
            _ => None,
        }
    }

    /// Whether the player side has eliminated every enemy.
    pub fn player_wins(&self) -> bool {
        !self.units.is_empty() && self.living_units(Team::Enemy).next().is_none()
    }

    /// Whether the enemy side has eliminated every player unit.
    pub fn enemy_wins(&self) -> bool {
        !self.units.is_empty() && self.living_units(Team::Player).next().is_none()
    }

    /// Whether the match has ended and no further actions are accepted.
    pub fn is_over(&self) -> bool {
        self.player_wins() || self.enemy_wins()
    }

    /// Recomputes fog from scratch and extends the visited memory.
    pub fn refresh_visibility(&mut self) {
        let visibility = compute_visibility(&self.units, &self.visited_tiles);
        self.fog_of_war = visibility.fog;
        self.visited_tiles = visibility.visited;
    }

    /// Whether a tile is visible to the player side this turn.
    pub fn is_visible(&self, pos: Position) -> bool {
        self.fog_of_war.get(pos) == Some(false)
    }

    /// Appends a line to the match history.
    pub fn record(&mut self, message: impl Into<String>) {
        self.history.push(message.into());
    }

    /// Returns a copy without down units and cleared cover, except where a
    /// tile is still referenced by an in-flight visual effect.
    ///
    /// Hosts call this once their effects expire; health is never changed.
    pub fn prune_resolved(&self, still_animating: &[Position]) -> GameState {
        let mut pruned = self.clone();
        pruned
            .units
            .retain(|unit| unit.is_alive() || still_animating.contains(&unit.position));

        let cleared: Vec<Position> = self
            .obstacles
            .iter()
            .copied()
            .filter(|&pos| {
                self.obstacle_health(pos).unwrap_or(0) == 0 && !still_animating.contains(&pos)
            })
            .collect();
        pruned.obstacles.retain(|pos| !cleared.contains(pos));
        pruned.obstacle_hp.retain(|pos, _| !cleared.contains(pos));

        if pruned
            .selected_unit_id
            .as_deref()
            .is_some_and(|id| pruned.unit(id).is_none())
        {
            pruned.selected_unit_id = None;
        }
        pruned
    }

    /// Checks the structural invariants a loaded state must satisfy.
    ///
    /// Invalid data is reported, never repaired.
    pub fn validate(&self) -> GridbreachResult<()> {
        if !self.fog_of_war.has_grid_dimensions() {
            return Err(invalid("fog of war has wrong dimensions"));
        }
        if !self.visited_tiles.has_grid_dimensions() {
            return Err(invalid("visited tiles have wrong dimensions"));
        }

        let mut ids = HashSet::new();
        let mut occupied = HashSet::new();
        for unit in &self.units {
            if !ids.insert(unit.id.as_str()) {
                return Err(invalid(format!("duplicate unit id {}", unit.id)));
            }
            if !unit.position.in_bounds() {
                return Err(invalid(format!(
                    "unit {} out of bounds at {}",
                    unit.id, unit.position
                )));
            }
            if unit.hp > unit.max_hp || unit.ap > unit.max_ap {
                return Err(invalid(format!("unit {} exceeds its maximums", unit.id)));
            }
            if unit.is_alive() && !occupied.insert(unit.position) {
                return Err(invalid(format!(
                    "two living units share tile {}",
                    unit.position
                )));
            }
        }

        let mut cover = HashSet::new();
        for &pos in &self.obstacles {
            if !pos.in_bounds() {
                return Err(invalid(format!("obstacle out of bounds at {pos}")));
            }
            if !cover.insert(pos) {
                return Err(invalid(format!("duplicate obstacle at {pos}")));
            }
            if !self.obstacle_hp.contains_key(&pos) {
                return Err(invalid(format!("obstacle at {pos} has no health entry")));
            }
        }
        if let Some(orphan) = self.obstacle_hp.keys().find(|pos| !cover.contains(*pos)) {
            return Err(invalid(format!("health entry at {orphan} has no obstacle")));
        }
        if let Some(unit) = self
            .units
            .iter()
            .find(|unit| unit.is_alive() && self.is_obstacle_standing(unit.position))
        {
            return Err(invalid(format!(
                "unit {} stands on cover at {}",
                unit.id, unit.position
            )));
        }

        if let Some(selected) = &self.selected_unit_id {
            if self.unit(selected).is_none() {
                return Err(invalid(format!("selected unit {selected} does not exist")));
            }
        }
        if self.is_ai_turn != (self.turn == Team::Enemy) {
            return Err(invalid("scripted flag disagrees with acting team"));
        }
        if self.opponent_turn.is_some() && !self.is_ai_turn {
            return Err(invalid("opponent progress outside the scripted turn"));
        }
        if self.turn_number == 0 {
            return Err(invalid("turn number starts at 1"));
        }

        Ok(())
    }

    /// Saves the game state to JSON.
    pub fn to_json(&self) -> GridbreachResult<String> {
        serde_json::to_string_pretty(self).map_err(GridbreachError::from)
    }

    /// Loads a game state from JSON, rejecting structurally invalid data.
    pub fn from_json(json: &str) -> GridbreachResult<Self> {
        let state: GameState = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }
}

fn invalid(message: impl Into<String>) -> GridbreachError {
    GridbreachError::InvalidState(message.into())
}

/// Persists the obstacle health map with `"x,y"` string keys.
mod obstacle_hp_keys {
    use crate::game::Position;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<Position, u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let keyed: BTreeMap<String, u32> =
            map.iter().map(|(pos, hp)| (pos.to_key(), *hp)).collect();
        keyed.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Position, u32>, D::Error> {
        let keyed = BTreeMap::<String, u32>::deserialize(deserializer)?;
        keyed
            .into_iter()
            .map(|(key, hp)| {
                Position::from_key(&key)
                    .map(|pos| (pos, hp))
                    .ok_or_else(|| D::Error::custom(format!("bad obstacle key {key:?}")))
            })
            .collect()
    }
}
