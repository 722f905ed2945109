//! Save/load behaviour of game states and battle records.

use gridbreach::{
    apply_attack_obstacle, create_initial_mission, end_turn, run_opponent_turn, BattleOutcome,
    BattleRecord, Facing, GameState, GridbreachError, GridbreachResult, Inventory,
    MissionConfig, Position, Team, Unit, UnitStats,
};
use serde_json::Value;

fn small_state() -> GameState {
    let stats = UnitStats {
        inventory: Inventory {
            grenades: 2,
            traps: 1,
            ..Inventory::default()
        },
        ..UnitStats::default()
    };
    GameState::new(
        vec![
            Unit::new("p0", Team::Player, Position::new(5, 9), Facing::Up, stats),
            Unit::new("e0", Team::Enemy, Position::new(12, 1), Facing::Down, UnitStats::default()),
        ],
        vec![(Position::new(5, 5), 2)],
        4,
    )
}

#[test]
fn test_json_field_names() -> GridbreachResult<()> {
    let state = apply_attack_obstacle(&small_state(), "p0", Position::new(5, 5))?;
    let tree: Value = serde_json::from_str(&state.to_json()?)?;

    assert_eq!(tree["obstacleHp"]["5,5"], 1);
    assert_eq!(tree["obstacles"][0]["x"], 5);
    assert_eq!(tree["turn"], "player");
    assert_eq!(tree["turnNumber"], 1);
    assert_eq!(tree["isAITurn"], false);
    assert_eq!(tree["fogOfWar"].as_array().map(Vec::len), Some(20));
    assert_eq!(tree["visitedTiles"][0].as_array().map(Vec::len), Some(15));

    let unit = &tree["units"][0];
    assert_eq!(unit["id"], "p0");
    assert_eq!(unit["x"], 5);
    assert_eq!(unit["maxHp"], 5);
    assert_eq!(unit["maxAp"], 3);
    assert_eq!(unit["ap"], 2);
    assert_eq!(unit["grenades"], 1);
    assert_eq!(unit["traps"], 1);
    assert_eq!(unit["facing"], "up");
    Ok(())
}

#[test]
fn test_state_survives_reload() -> GridbreachResult<()> {
    let state = create_initial_mission(&MissionConfig::new(21))?;
    let state = run_opponent_turn(&end_turn(&state)?)?;

    let loaded = GameState::from_json(&state.to_json()?)?;
    assert_eq!(loaded, state);
    Ok(())
}

fn reload_after(edit: impl Fn(&mut Value)) -> GridbreachResult<GameState> {
    let mut tree: Value = serde_json::from_str(&small_state().to_json()?)?;
    edit(&mut tree);
    GameState::from_json(&tree.to_string())
}

type Edit = Box<dyn Fn(&mut Value)>;

fn edit(change: impl Fn(&mut Value) + 'static) -> Edit {
    Box::new(change)
}

#[test]
fn test_structurally_invalid_states_rejected() {
    let cases: Vec<(&str, Edit)> = vec![
        ("short fog", edit(|tree| {
            tree["fogOfWar"].as_array_mut().unwrap().pop();
        })),
        ("duplicate id", edit(|tree| tree["units"][1]["id"] = "p0".into())),
        ("off grid", edit(|tree| tree["units"][0]["x"] = 15.into())),
        ("orphan health", edit(|tree| tree["obstacleHp"]["1,1"] = 2.into())),
        ("flag mismatch", edit(|tree| tree["isAITurn"] = true.into())),
        ("unit on cover", edit(|tree| tree["units"][0]["y"] = 5.into())),
        ("stray progress", edit(|tree| {
            tree["opponentTurn"] = serde_json::json!({ "order": ["e0"], "cursor": 0, "stepsTaken": 0 });
        })),
    ];

    for (name, edit) in cases {
        match reload_after(edit) {
            Err(GridbreachError::InvalidState(_)) => {}
            other => panic!("{name}: expected InvalidState, got {other:?}"),
        }
    }
}

#[test]
fn test_malformed_obstacle_key_rejected() {
    let result = reload_after(|tree| {
        tree["obstacleHp"] = serde_json::json!({ "five,five": 2 });
    });
    assert!(matches!(result, Err(GridbreachError::Serde(_))));
}

#[test]
fn test_battle_record_file_round_trip() -> GridbreachResult<()> {
    let start = small_state();
    let mut finish = apply_attack_obstacle(&start, "p0", Position::new(5, 5))?;
    finish.unit_mut("p0").unwrap().hp = 0;

    let record = BattleRecord::new(vec![start, finish])?;
    assert_eq!(record.result, BattleOutcome::Loss);
    assert!(record.name.starts_with("OP-"));

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("battle.json");
    record.save_to_file(&path)?;

    let loaded = BattleRecord::load_from_file(&path)?;
    assert_eq!(loaded, record);
    assert_eq!(loaded.history.len(), 2);
    Ok(())
}

#[test]
fn test_battle_record_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = BattleRecord::load_from_file(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(GridbreachError::Io(_))));
}
