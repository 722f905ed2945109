//! # Grid Geometry
//!
//! Distance and line-of-sight calculations on the battlefield grid.

use crate::game::Position;

/// Segments at or below this length (in tile units) never self-occlude.
const ADJACENT_CLEAR_DISTANCE: f64 = 1.1;

/// Samples taken per tile unit of segment length.
const SAMPLES_PER_TILE: f64 = 10.0;

/// Manhattan distance between two tiles. Used for range checks and movement cost.
///
/// # Examples
///
/// ```
/// use gridbreach::{distance, Position};
///
/// assert_eq!(distance(Position::new(3, 18), Position::new(3, 1)), 17);
/// ```
pub fn distance(a: Position, b: Position) -> u32 {
    a.manhattan_distance(b)
}

/// Tests whether the straight segment between two tile centres is unobstructed.
///
/// The segment is sampled ten times per tile of length and each sample is
/// truncated to its containing tile. Any sampled tile other than the two
/// endpoints that holds an obstacle blocks sight. Tiles closer than 1.1
/// apart are always clear.
///
/// This is a sampled approximation, not exact Bresenham occlusion; a segment
/// that only grazes the corner of an obstacle tile may be reported clear.
///
/// # Examples
///
/// ```
/// use gridbreach::{line_of_sight_clear, Position};
///
/// let from = Position::new(0, 0);
/// let to = Position::new(4, 0);
/// assert!(line_of_sight_clear(from, to, &[]));
/// assert!(!line_of_sight_clear(from, to, &[Position::new(2, 0)]));
/// ```
pub fn line_of_sight_clear(from: Position, to: Position, obstacles: &[Position]) -> bool {
    let x0 = f64::from(from.x) + 0.5;
    let y0 = f64::from(from.y) + 0.5;
    let dx = f64::from(to.x - from.x);
    let dy = f64::from(to.y - from.y);
    let length = (dx * dx + dy * dy).sqrt();

    if length <= ADJACENT_CLEAR_DISTANCE || obstacles.is_empty() {
        return true;
    }

    let steps = (length * SAMPLES_PER_TILE).ceil() as u32;
    for i in 1..steps {
        let t = f64::from(i) / f64::from(steps);
        let sample = Position::new(
            (x0 + dx * t).floor() as i32,
            (y0 + dy * t).floor() as i32,
        );

        if sample == from || sample == to {
            continue;
        }

        if obstacles.contains(&sample) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Position::new(2, 9);
        let b = Position::new(11, 4);
        assert_eq!(distance(a, b), 14);
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0);
    }

    #[test]
    fn test_adjacent_tiles_always_clear() {
        let from = Position::new(5, 5);
        let obstacles = vec![Position::new(6, 5), Position::new(5, 6)];
        assert!(line_of_sight_clear(from, Position::new(6, 5), &obstacles));
        assert!(line_of_sight_clear(from, Position::new(5, 4), &obstacles));
    }

    #[test]
    fn test_straight_line_blocked() {
        let obstacles = vec![Position::new(5, 8)];
        assert!(!line_of_sight_clear(
            Position::new(5, 5),
            Position::new(5, 10),
            &obstacles
        ));
    }

    #[test]
    fn test_endpoints_do_not_block() {
        // Cover on the target tile itself must not hide it.
        let obstacles = vec![Position::new(9, 5)];
        assert!(line_of_sight_clear(
            Position::new(5, 5),
            Position::new(9, 5),
            &obstacles
        ));
    }

    #[test]
    fn test_offset_obstacle_does_not_block() {
        let obstacles = vec![Position::new(7, 3)];
        assert!(line_of_sight_clear(
            Position::new(5, 5),
            Position::new(9, 5),
            &obstacles
        ));
    }

    #[test]
    fn test_diagonal_blocked() {
        let obstacles = vec![Position::new(2, 2)];
        assert!(!line_of_sight_clear(
            Position::new(0, 0),
            Position::new(4, 4),
            &obstacles
        ));
    }
}
