//! # Gridbreach Headless Skirmish
//!
//! Generates a mission, plays both sides to completion, and reports the result.
//! The player squad is driven by a greedy autopilot through the public action
//! API; the enemy squad by the scripted opponent controller.

use clap::Parser;
use gridbreach::{
    advise_or_fallback, can_attack, create_initial_mission, find_next_step_towards,
    render_board, render_messages, render_roster, Action, BattleOutcome, BattleRecord,
    GameState, GridbreachResult, MissionConfig, OfflineAdvisor, Team,
};
use log::{debug, info, LevelFilter};
use std::path::PathBuf;

/// Command line arguments for the skirmish runner.
#[derive(Parser, Debug)]
#[command(name = "gridbreach")]
#[command(about = "Headless squad tactics skirmish on a 15x20 grid")]
#[command(version)]
struct Args {
    /// Random seed for mission generation and opponent turn order
    #[arg(short, long)]
    seed: Option<u64>,

    /// Mission configuration file (JSON); its seed is overridden by --seed
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many turns if neither side has won
    #[arg(long, default_value_t = 50)]
    max_turns: u32,

    /// Write the battle record to this file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the board at the start of every player turn
    #[arg(long)]
    board: bool,

    /// Print offline tactical advice at the start of every player turn
    #[arg(long)]
    advice: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> GridbreachResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Gridbreach v{}", gridbreach::VERSION);

    let mut config = match &args.config {
        Some(path) => MissionConfig::from_json_file(path)?,
        None => MissionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let history = run_skirmish(&args, &config)?;
    let record = BattleRecord::new(history)?;

    let outcome = match record.result {
        BattleOutcome::Win => "WIN",
        BattleOutcome::Loss => "LOSS",
        BattleOutcome::InProgress => "IN_PROGRESS",
    };
    let turns = record.final_state().map_or(0, |state| state.turn_number);
    println!("{}: {} after {} turns", record.name, outcome, turns);

    if let Some(path) = &args.export {
        record.save_to_file(path)?;
    }
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    let level = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

/// Plays the mission until one side wins or the turn limit is reached.
/// Returns every state the battle passed through.
fn run_skirmish(args: &Args, config: &MissionConfig) -> GridbreachResult<Vec<GameState>> {
    let mut state = create_initial_mission(config)?;
    let mut history = vec![state.clone()];

    while !state.is_over() && state.turn_number <= args.max_turns {
        if args.board {
            println!("{}", render_board(&state));
            print!("{}", render_roster(&state));
            print!("{}", render_messages(&state));
        }
        if args.advice {
            println!("Advisor: {}", advise_or_fallback(&OfflineAdvisor, &state));
        }

        for unit_id in squad_ids(&state) {
            while let Some(action) = autopilot_action(&state, &unit_id) {
                match action.apply(&state) {
                    Ok(next) => {
                        state = next.prune_resolved(&[]);
                        history.push(state.clone());
                    }
                    Err(error) => {
                        debug!("Autopilot action for {unit_id} refused: {error}");
                        break;
                    }
                }
            }
        }
        if state.is_over() {
            break;
        }

        state = Action::EndTurn.apply(&state)?;
        history.push(state.clone());

        while state.is_ai_turn && !state.is_over() {
            state = Action::OpponentStep.apply(&state)?.prune_resolved(&[]);
            history.push(state.clone());
        }
    }

    if !state.is_over() {
        info!("Turn limit of {} reached", args.max_turns);
    }
    Ok(history)
}

fn squad_ids(state: &GameState) -> Vec<String> {
    state
        .living_units(Team::Player)
        .map(|unit| unit.id.clone())
        .collect()
}

/// Greedy choice for one player unit: shoot the first enemy in reach,
/// otherwise step toward the first enemy.
fn autopilot_action(state: &GameState, unit_id: &str) -> Option<Action> {
    if state.is_over() {
        return None;
    }
    let unit = state.unit(unit_id).filter(|unit| unit.is_alive() && unit.ap > 0)?;
    let cover = state.standing_obstacles();

    if let Some(target) = state
        .living_units(Team::Enemy)
        .find(|enemy| can_attack(unit, enemy, &cover))
    {
        return Some(Action::AttackUnit {
            attacker_id: unit.id.clone(),
            target_id: target.id.clone(),
        });
    }

    let quarry = state.living_units(Team::Enemy).next()?;
    let step = find_next_step_towards(state, unit, quarry.position)?;
    Some(Action::Move {
        unit_id: unit.id.clone(),
        target: step,
    })
}
