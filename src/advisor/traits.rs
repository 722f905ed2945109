//! # Advisor Traits
//!
//! Trait definitions for tactical advisory services.

use crate::game::GameState;
use crate::GridbreachResult;

/// A read-only source of tactical suggestions.
///
/// Implementations receive a borrowed state and can never change it. Errors
/// are reported to the caller, which is expected to fall back to a default
/// line instead of interrupting play; see [`crate::advisor::advise_or_fallback`].
pub trait TacticalAdvisor {
    /// Produces a one-sentence suggestion for the acting side.
    fn advise(&self, state: &GameState) -> GridbreachResult<String>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
