//! End-to-end rule scenarios on an open 15x20 grid.

use gridbreach::{
    apply_attack_obstacle, apply_attack_unit, apply_move, can_attack, distance, end_turn,
    run_opponent_step, ActionError, Facing, GameState, GridbreachResult, Inventory, Position,
    Team, Unit, UnitStats,
};

fn rifleman(id: &str, team: Team, x: i32, y: i32, facing: Facing) -> Unit {
    let stats = UnitStats {
        inventory: Inventory {
            grenades: 6,
            ..Inventory::default()
        },
        ..UnitStats::default()
    };
    Unit::new(id, team, Position::new(x, y), facing, stats)
}

#[test]
fn test_advance_then_engage() -> GridbreachResult<()> {
    let mut state = GameState::new(
        vec![
            rifleman("p0", Team::Player, 3, 18, Facing::Up),
            rifleman("e0", Team::Enemy, 3, 1, Facing::Down),
        ],
        vec![],
        1,
    );

    let shooter = |state: &GameState| state.unit("p0").cloned().unwrap();
    let target = |state: &GameState| state.unit("e0").cloned().unwrap();
    assert!(!can_attack(&shooter(&state), &target(&state), &[]));

    while !can_attack(&shooter(&state), &target(&state), &[]) {
        if shooter(&state).ap == 0 {
            state.unit_mut("p0").unwrap().refill_ap();
        }
        let next = shooter(&state).position + Position::new(0, -1);
        state = apply_move(&state, "p0", next)?;
    }
    assert_eq!(shooter(&state).position, Position::new(3, 6));
    assert!(distance(shooter(&state).position, target(&state).position) <= 5);

    if shooter(&state).ap == 0 {
        state.unit_mut("p0").unwrap().refill_ap();
    }
    let ap_before = shooter(&state).ap;
    let after = apply_attack_unit(&state, "p0", "e0")?;
    assert_eq!(target(&after).hp, 4);
    assert_eq!(shooter(&after).ap, ap_before - 1);
    Ok(())
}

#[test]
fn test_cover_is_destroyed_in_two_blasts() -> GridbreachResult<()> {
    let cover = Position::new(5, 5);
    let state = GameState::new(
        vec![
            rifleman("p0", Team::Player, 5, 9, Facing::Up),
            rifleman("e0", Team::Enemy, 12, 1, Facing::Down),
        ],
        vec![(cover, 2)],
        1,
    );

    let once = apply_attack_obstacle(&state, "p0", cover)?;
    assert_eq!(once.obstacle_health(cover), Some(1));
    let twice = apply_attack_obstacle(&once, "p0", cover)?;
    assert_eq!(twice.obstacle_health(cover), Some(0));

    assert_eq!(
        apply_attack_obstacle(&twice, "p0", cover),
        Err(ActionError::AlreadyCleared(cover))
    );
    assert_eq!(twice.obstacle_health(cover), Some(0));

    // Rubble no longer blocks the route straight through it
    let path_state = twice.clone();
    let walker = path_state.unit("p0").unwrap();
    let path = gridbreach::find_path(&path_state, walker, Position::new(5, 4)).unwrap();
    assert_eq!(path.len(), 5);
    Ok(())
}

#[test]
fn test_unreachable_squad_still_ends_turn() -> GridbreachResult<()> {
    let state = GameState::new(
        vec![
            rifleman("p0", Team::Player, 14, 19, Facing::Up),
            rifleman("e0", Team::Enemy, 0, 0, Facing::Down),
            rifleman("e1", Team::Enemy, 2, 0, Facing::Down),
            rifleman("e2", Team::Enemy, 4, 0, Facing::Down),
        ],
        vec![(Position::new(13, 19), 2), (Position::new(14, 18), 2)],
        31,
    );
    let mut state = end_turn(&state)?;
    let turn_before = state.turn_number;

    let mut steps = 0;
    while state.is_ai_turn {
        state = run_opponent_step(&state)?;
        steps += 1;
        assert!(steps <= 3 * 3 + 1, "opponent turn did not terminate");
    }
    assert_eq!(state.turn, Team::Player);
    assert_eq!(state.turn_number, turn_before + 1);
    Ok(())
}

#[test]
fn test_win_predicate_is_symmetric() {
    let mut state = GameState::new(
        vec![
            rifleman("p0", Team::Player, 3, 18, Facing::Up),
            rifleman("e0", Team::Enemy, 3, 1, Facing::Down),
        ],
        vec![],
        1,
    );
    assert!(!state.player_wins() && !state.enemy_wins());

    let mut lost = state.clone();
    lost.unit_mut("p0").unwrap().hp = 0;
    assert!(lost.enemy_wins());
    assert!(!lost.player_wins());

    state.unit_mut("e0").unwrap().hp = 0;
    assert!(state.player_wins());
    assert!(!state.enemy_wins());
    assert_eq!(state.winner(), Some(Team::Player));
}

#[test]
fn test_end_turn_refills_the_incoming_side() -> GridbreachResult<()> {
    let mut state = GameState::new(
        vec![
            rifleman("p0", Team::Player, 3, 18, Facing::Up),
            rifleman("e0", Team::Enemy, 3, 1, Facing::Down),
        ],
        vec![],
        1,
    );
    state.unit_mut("e0").unwrap().ap = 0;
    state = apply_move(&state, "p0", Position::new(3, 16))?;

    let next = end_turn(&state)?;
    assert_eq!(next.unit("e0").unwrap().ap, next.unit("e0").unwrap().max_ap);
    Ok(())
}

#[test]
fn test_transitions_leave_input_untouched() -> GridbreachResult<()> {
    let state = GameState::new(
        vec![
            rifleman("p0", Team::Player, 3, 10, Facing::Up),
            rifleman("e0", Team::Enemy, 3, 6, Facing::Down),
        ],
        vec![(Position::new(8, 8), 2)],
        1,
    );
    let snapshot = state.clone();

    let moved = apply_move(&state, "p0", Position::new(4, 10))?;
    let _shot = apply_attack_unit(&moved, "p0", "e0")?;
    let _ended = end_turn(&moved)?;

    assert_eq!(state, snapshot);
    assert_eq!(moved.unit("e0").unwrap().hp, 5);
    Ok(())
}
