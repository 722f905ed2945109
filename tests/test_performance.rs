//! Performance tests for the per-action recomputation paths

use gridbreach::{
    compute_visibility, create_initial_mission, find_path, GridbreachResult, MissionConfig,
    Position,
};
use std::time::Instant;

#[test]
fn test_visibility_recompute_performance() -> GridbreachResult<()> {
    let state = create_initial_mission(&MissionConfig::new(12345))?;

    let start = Instant::now();
    let iterations = 1000;
    let mut visited = state.visited_tiles.clone();
    for _ in 0..iterations {
        visited = compute_visibility(&state.units, &visited).visited;
    }
    let duration = start.elapsed();

    println!("Visibility recompute: {iterations} iterations in {duration:?}");
    println!("Average per recompute: {:?}", duration / iterations);

    // Full recompute runs after every action; it must stay far below frame time
    assert!(
        duration.as_millis() < 5000,
        "Visibility recompute too slow: {duration:?}"
    );
    Ok(())
}

#[test]
fn test_pathfinding_performance() -> GridbreachResult<()> {
    let state = create_initial_mission(&MissionConfig::new(4242))?;
    let Some(mover) = state.unit("p0") else {
        panic!("mission is missing p0");
    };

    let start = Instant::now();
    let iterations = 200;
    for i in 0..iterations {
        let goal = Position::new(i % 15, 2 + (i % 3));
        let _ = find_path(&state, mover, goal);
    }
    let duration = start.elapsed();

    println!("Pathfinding: {iterations} searches in {duration:?}");
    assert!(duration.as_millis() < 5000, "Pathfinding too slow: {duration:?}");
    Ok(())
}
