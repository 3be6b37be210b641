// Player positions and roster slot labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions the engine knows how to place and age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    DefensiveLine,
    Linebacker,
    DefensiveBack,
}

/// Positions that get a surplus/shallow breakdown.
pub const NEED_POSITIONS: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
];

impl Position {
    /// Parse a platform position string.
    ///
    /// Handles the common aliases: "DST"/"D/ST" -> Defense, "PK" -> Kicker,
    /// "DE"/"DT" -> DefensiveLine, "CB"/"S" -> DefensiveBack.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            "DL" | "DE" | "DT" => Some(Position::DefensiveLine),
            "LB" => Some(Position::Linebacker),
            "DB" | "CB" | "S" => Some(Position::DefensiveBack),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
            Position::DefensiveLine => "DL",
            Position::Linebacker => "LB",
            Position::DefensiveBack => "DB",
        }
    }

    /// Whether this is an individual defensive player position.
    pub fn is_idp(&self) -> bool {
        matches!(
            self,
            Position::DefensiveLine | Position::Linebacker | Position::DefensiveBack
        )
    }

    /// Whether this position can fill a standard FLEX slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Slot labels
// ---------------------------------------------------------------------------

/// A roster slot label as it appears in a league's position schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A slot that only accepts one position.
    Dedicated(Position),
    /// RB/WR/TE.
    Flex,
    /// RB/WR.
    WrRbFlex,
    /// WR/TE.
    RecFlex,
    /// QB/RB/WR/TE.
    SuperFlex,
    /// DL/LB/DB.
    IdpFlex,
    Bench,
    InjuredReserve,
    Taxi,
    /// Any label we don't recognize. Counts as a starter and accepts anyone.
    Other(String),
}

impl Slot {
    /// Parse a slot label. Never fails: unknown labels become `Slot::Other`.
    pub fn from_label(label: &str) -> Self {
        let upper = label.trim().to_uppercase();
        match upper.as_str() {
            "FLEX" => Slot::Flex,
            "WRRB_FLEX" => Slot::WrRbFlex,
            "REC_FLEX" => Slot::RecFlex,
            "SUPER_FLEX" => Slot::SuperFlex,
            "IDP_FLEX" => Slot::IdpFlex,
            "BN" => Slot::Bench,
            "IR" => Slot::InjuredReserve,
            "TAXI" => Slot::Taxi,
            other => match Position::from_str_pos(other) {
                Some(pos) => Slot::Dedicated(pos),
                None => Slot::Other(upper),
            },
        }
    }

    /// Whether this slot is one of the reserved non-starting slots.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Slot::Bench | Slot::InjuredReserve | Slot::Taxi)
    }

    /// Whether a player at `pos` may occupy this slot.
    ///
    /// Players with an unrecognized position can only fill `Other` slots.
    pub fn accepts(&self, pos: Option<Position>) -> bool {
        match (self, pos) {
            (Slot::Other(_), _) => true,
            (_, None) => false,
            (Slot::Dedicated(slot_pos), Some(p)) => *slot_pos == p,
            (Slot::Flex, Some(p)) => p.is_flex_eligible(),
            (Slot::WrRbFlex, Some(p)) => {
                matches!(p, Position::RunningBack | Position::WideReceiver)
            }
            (Slot::RecFlex, Some(p)) => matches!(p, Position::WideReceiver | Position::TightEnd),
            (Slot::SuperFlex, Some(p)) => p == Position::Quarterback || p.is_flex_eligible(),
            (Slot::IdpFlex, Some(p)) => p.is_idp(),
            (Slot::Bench | Slot::InjuredReserve | Slot::Taxi, Some(_)) => false,
        }
    }

    /// Fill order for lineup assignment: dedicated slots first, then flex
    /// slots from most to least restrictive, then unknown labels.
    pub fn fill_order(&self) -> u8 {
        match self {
            Slot::Dedicated(_) => 0,
            Slot::WrRbFlex | Slot::RecFlex => 1,
            Slot::Flex | Slot::IdpFlex => 2,
            Slot::SuperFlex => 3,
            Slot::Other(_) => 4,
            Slot::Bench | Slot::InjuredReserve | Slot::Taxi => 5,
        }
    }
}
