//! # Rendering Module
//!
//! Plain-text views of a game state for terminals and logs.
//!
//! Rendering only reads state; drawing never feeds back into the rules.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
