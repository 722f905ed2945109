//! # Mission Generation
//!
//! Symmetric squad deployment along the short edges and random cover in the
//! open ground between them.

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::game::{Facing, GameState, Position, Team, Unit};
use crate::generation::{utils, Generator, MissionConfig};
use crate::{GridbreachError, GridbreachResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeSet;

/// Builds the opening state of a mission.
#[derive(Debug, Clone, Default)]
pub struct MissionGenerator;

impl MissionGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Deploys both squads: players along the bottom row above the edge,
    /// enemies along the second row from the top, two tiles apart.
    fn deploy_squads(&self, config: &MissionConfig) -> Vec<Unit> {
        let player_row = GRID_HEIGHT - 2;
        let enemy_row = 1;

        let players = (0..config.squad_size).map(|i| {
            Unit::new(
                format!("p{i}"),
                Team::Player,
                Position::new(3 + 2 * i as i32, player_row),
                Facing::Up,
                config.player_stats,
            )
        });
        let enemies = (0..config.squad_size).map(|i| {
            Unit::new(
                format!("e{i}"),
                Team::Enemy,
                Position::new(3 + 2 * i as i32, enemy_row),
                Facing::Down,
                config.enemy_stats,
            )
        });
        players.chain(enemies).collect()
    }

    /// Scatters cover, skipping attempts that land on existing cover or a unit.
    fn scatter_cover(
        &self,
        units: &[Unit],
        config: &MissionConfig,
        rng: &mut StdRng,
    ) -> Vec<(Position, u32)> {
        let rows = config.deployment_margin..(GRID_HEIGHT - config.deployment_margin);
        let mut placed = BTreeSet::new();
        let mut cover = Vec::new();

        if rows.is_empty() {
            return cover;
        }

        for _ in 0..config.obstacle_attempts {
            let pos = Position::new(rng.gen_range(0..GRID_WIDTH), rng.gen_range(rows.clone()));
            if placed.contains(&pos) || units.iter().any(|unit| unit.position == pos) {
                continue;
            }
            placed.insert(pos);
            cover.push((pos, config.obstacle_health));
        }

        debug!(
            "Placed {} cover tiles from {} attempts",
            cover.len(),
            config.obstacle_attempts
        );
        cover
    }
}

impl Generator<GameState> for MissionGenerator {
    fn generate(&self, config: &MissionConfig, rng: &mut StdRng) -> GridbreachResult<GameState> {
        let units = self.deploy_squads(config);
        let cover = self.scatter_cover(&units, config, rng);
        let state = GameState::new(units, cover, config.seed);

        self.validate(&state, config)?;
        Ok(state)
    }

    fn validate(&self, state: &GameState, config: &MissionConfig) -> GridbreachResult<()> {
        for team in [Team::Player, Team::Enemy] {
            if state.living_units(team).count() != config.squad_size {
                return Err(GridbreachError::GenerationFailed(format!(
                    "{team} squad does not have {} units",
                    config.squad_size
                )));
            }
        }
        state
            .validate()
            .map_err(|error| GridbreachError::GenerationFailed(error.to_string()))
    }

    fn generator_type(&self) -> &'static str {
        "MissionGenerator"
    }
}

/// Largest squad whose two-tile spacing from column 3 stays on the grid.
fn max_squad_size() -> usize {
    ((GRID_WIDTH - 4) / 2 + 1) as usize
}

/// Creates the opening state for a mission.
///
/// # Examples
///
/// ```
/// use gridbreach::{create_initial_mission, MissionConfig, Team};
///
/// let state = create_initial_mission(&MissionConfig::new(7)).unwrap();
/// assert_eq!(state.living_units(Team::Player).count(), 5);
/// assert_eq!(state.living_units(Team::Enemy).count(), 5);
/// assert_eq!(state.turn_number, 1);
/// ```
pub fn create_initial_mission(config: &MissionConfig) -> GridbreachResult<GameState> {
    if config.squad_size == 0 || config.squad_size > max_squad_size() {
        return Err(GridbreachError::GenerationFailed(format!(
            "a squad of {} does not fit the grid",
            config.squad_size
        )));
    }

    let generator = MissionGenerator::new();
    let mut rng = utils::create_rng(config);
    let state = generator.generate(config, &mut rng)?;

    info!(
        "{} created mission with seed {} ({} cover tiles)",
        generator.generator_type(),
        config.seed,
        state.obstacles.len()
    );
    Ok(state)
}
