//! # Gridbreach
//!
//! Rules engine for a turn-based squad tactics game played on a fixed grid.
//!
//! ## Architecture Overview
//!
//! The engine is a set of pure state transitions. Every operation takes the
//! current [`GameState`] plus an intent and returns a brand new state, or an
//! [`ActionError`] explaining why the intent was refused. The input state is
//! never touched, so hosts can keep every snapshot for replay or undo.
//!
//! - **Grid & Geometry**: Manhattan distance and sampled line of sight
//! - **Visibility**: per-action fog recompute plus a persistent "visited" mask
//! - **Movement**: single-step legality and breadth-first path search
//! - **Combat**: range/LOS gated attacks on units and destructible cover
//! - **Turns**: action point budgets, turn hand-over and win detection
//! - **Opponent**: a scripted controller stepped one unit-action at a time
//!
//! Rendering, audio and storage live outside this crate. The
//! [`advisor`] module defines the boundary to an optional text advisory
//! service that only ever reads state.

pub mod advisor;
pub mod game;
pub mod generation;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use advisor::*;
pub use game::*;
pub use generation::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Gridbreach engine.
#[derive(thiserror::Error, Debug)]
pub enum GridbreachError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is structurally invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action was refused by the rules
    #[error("Action rejected: {0}")]
    Rejected(#[from] ActionError),

    /// Mission generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Advisory service error
    #[error("Advisor error: {0}")]
    Advisor(String),
}

/// Result type used throughout the Gridbreach codebase.
pub type GridbreachResult<T> = Result<T, GridbreachError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Battlefield width in tiles
    pub const GRID_WIDTH: i32 = 15;

    /// Battlefield height in tiles
    pub const GRID_HEIGHT: i32 = 20;

    /// Units fielded by each side at mission start
    pub const SQUAD_SIZE: usize = 5;

    /// Euclidean radius of the all-round sight reveal
    pub const SIGHT_RADIUS: f64 = 4.5;

    /// Depth in rings of the directional sight cone
    pub const CONE_DEPTH: i32 = 7;

    /// Number of random obstacle placement attempts
    pub const OBSTACLE_ATTEMPTS: u32 = 25;

    /// Structural health of freshly placed cover
    pub const OBSTACLE_HEALTH: u32 = 2;

    /// Rows kept free of cover next to each deployment edge
    pub const DEPLOYMENT_MARGIN: i32 = 3;

    /// First line written to every mission history
    pub const MISSION_START_MESSAGE: &str = "Mission Start: Grid penetration successful.";
}
