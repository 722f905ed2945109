//! Property tests for geometry, pathfinding, visibility and action points.

use gridbreach::config::{GRID_HEIGHT, GRID_WIDTH};
use gridbreach::{
    apply_move, compute_visibility, distance, find_path, line_of_sight_clear, Facing, GameState,
    Position, Team, TileMask, Unit, UnitStats,
};
use proptest::prelude::*;

fn position() -> impl Strategy<Value = Position> {
    (0..GRID_WIDTH, 0..GRID_HEIGHT).prop_map(|(x, y)| Position::new(x, y))
}

fn facing() -> impl Strategy<Value = Facing> {
    prop_oneof![
        Just(Facing::Up),
        Just(Facing::Down),
        Just(Facing::Left),
        Just(Facing::Right),
    ]
}

fn scout(id: &str, team: Team, pos: Position, facing: Facing) -> Unit {
    Unit::new(id, team, pos, facing, UnitStats::default())
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in position(), b in position()) {
        prop_assert_eq!(distance(a, a), 0);
        prop_assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn open_ground_never_blocks_sight(a in position(), b in position()) {
        prop_assert!(line_of_sight_clear(a, b, &[]));
    }

    #[test]
    fn paths_avoid_cover_and_units(
        start in position(),
        goal in position(),
        cover in prop::collection::vec(position(), 0..40),
        blocker in position(),
    ) {
        prop_assume!(blocker != start);
        let cover: Vec<(Position, u32)> = cover
            .into_iter()
            .filter(|&pos| pos != start && pos != blocker)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .map(|pos| (pos, 2))
            .collect();
        let mover = scout("p0", Team::Player, start, Facing::Up);
        let state = GameState::new(
            vec![mover.clone(), scout("e0", Team::Enemy, blocker, Facing::Down)],
            cover,
            1,
        );

        if let Some(path) = find_path(&state, &mover, goal) {
            let mut previous = start;
            for &step in &path {
                prop_assert!(step.in_bounds());
                prop_assert_eq!(distance(previous, step), 1);
                prop_assert!(!state.is_obstacle_standing(step));
                prop_assert_ne!(step, blocker);
                previous = step;
            }
            prop_assert_eq!(previous, goal);
        }
    }

    #[test]
    fn visited_never_forgets(
        placements in prop::collection::vec((position(), facing()), 1..8),
    ) {
        let mut visited = TileMask::filled(false);
        for (pos, facing) in placements {
            let units = vec![scout("p0", Team::Player, pos, facing)];
            let next = compute_visibility(&units, &visited);
            for y in 0..GRID_HEIGHT {
                for x in 0..GRID_WIDTH {
                    let tile = Position::new(x, y);
                    if visited.get(tile) == Some(true) {
                        prop_assert_eq!(next.visited.get(tile), Some(true));
                    }
                    if next.fog.get(tile) == Some(false) {
                        prop_assert_eq!(next.visited.get(tile), Some(true));
                    }
                }
            }
            visited = next.visited;
        }
    }

    #[test]
    fn moves_respect_action_points(
        start in position(),
        targets in prop::collection::vec(position(), 1..6),
    ) {
        let mut state = GameState::new(vec![scout("p0", Team::Player, start, Facing::Up)], vec![], 1);
        for target in targets {
            let before = state.unit("p0").unwrap().clone();
            match apply_move(&state, "p0", target) {
                Ok(next) => {
                    let after = next.unit("p0").unwrap();
                    prop_assert_eq!(after.position, target);
                    prop_assert_eq!(before.ap - after.ap, distance(before.position, target));
                    prop_assert!(after.ap <= after.max_ap);
                    state = next;
                }
                Err(_) => prop_assert_eq!(state.unit("p0").unwrap(), &before),
            }
        }
    }
}
