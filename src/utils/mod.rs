//! # Utilities Module
//!
//! Grid geometry and pathfinding shared by the movement, combat and opponent code.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;
