//! # Units
//!
//! Squad members, their stats and consumable inventories.

use crate::game::{Facing, Position, Team, UnitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consumable charges carried by a unit.
///
/// Every counter is spent one per use and never refilled during a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Charges for blasting destructible cover
    pub grenades: u32,
    /// Carried for persistence compatibility; no action spends it yet
    pub aims: u32,
    pub walls: u32,
    pub stealth: u32,
    pub traps: u32,
}

impl Inventory {
    /// Current charge count for a special action.
    pub fn charges(&self, kind: SpecialKind) -> u32 {
        match kind {
            SpecialKind::Wall => self.walls,
            SpecialKind::Stealth => self.stealth,
            SpecialKind::Trap => self.traps,
        }
    }

    fn charges_mut(&mut self, kind: SpecialKind) -> &mut u32 {
        match kind {
            SpecialKind::Wall => &mut self.walls,
            SpecialKind::Stealth => &mut self.stealth,
            SpecialKind::Trap => &mut self.traps,
        }
    }

    /// Spends one charge of `kind`. Returns false when none are left.
    pub fn consume(&mut self, kind: SpecialKind) -> bool {
        let counter = self.charges_mut(kind);
        if *counter == 0 {
            return false;
        }
        *counter -= 1;
        true
    }

    /// Spends one grenade. Returns false when none are left.
    pub fn consume_grenade(&mut self) -> bool {
        if self.grenades == 0 {
            return false;
        }
        self.grenades -= 1;
        true
    }
}

/// Non-combat special actions gated by inventory charges.
///
/// Using one only spends a charge. No battlefield effect is attached yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialKind {
    Wall,
    Stealth,
    Trap,
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialKind::Wall => f.write_str("wall"),
            SpecialKind::Stealth => f.write_str("stealth"),
            SpecialKind::Trap => f.write_str("trap"),
        }
    }
}

/// A squad member on the battlefield.
///
/// A unit with `hp == 0` is down: it no longer acts, blocks tiles, or
/// contributes to visibility, but stays in the state until the host prunes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    #[serde(flatten)]
    pub position: Position,
    pub hp: u32,
    pub max_hp: u32,
    pub ap: u32,
    pub max_ap: u32,
    /// Engagement range in Manhattan tiles
    pub range: u32,
    pub team: Team,
    pub facing: Facing,
    #[serde(flatten)]
    pub inventory: Inventory,
}

impl Unit {
    /// Creates a unit at full health and action points.
    pub fn new(
        id: impl Into<UnitId>,
        team: Team,
        position: Position,
        facing: Facing,
        stats: UnitStats,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            ap: stats.max_ap,
            max_ap: stats.max_ap,
            range: stats.range,
            team,
            facing,
            inventory: stats.inventory,
        }
    }

    /// Checks if the unit is still in the fight.
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies one point of damage, floored at zero.
    pub fn take_hit(&mut self) {
        self.hp = self.hp.saturating_sub(1);
    }

    /// Spends action points. Returns false (and spends nothing) if short.
    pub fn spend_ap(&mut self, amount: u32) -> bool {
        if self.ap < amount {
            return false;
        }
        self.ap -= amount;
        true
    }

    /// Restores action points to the maximum.
    pub fn refill_ap(&mut self) {
        self.ap = self.max_ap;
    }
}

/// Template for creating units of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_hp: u32,
    pub max_ap: u32,
    pub range: u32,
    pub inventory: Inventory,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            max_hp: 5,
            max_ap: 3,
            range: 5,
            inventory: Inventory::default(),
        }
    }
}
