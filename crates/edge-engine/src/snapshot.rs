// League snapshot input model: rosters, players, picks.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{ArchetypeConfig, EdgeEngineWeights};
use crate::roster::position::Position;

/// A rostered player with an externally priced trade value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub full_name: String,
    /// Raw platform position string ("QB", "WR", ...). Unrecognized strings
    /// are kept as-is and simply have no age curve or slot eligibility.
    pub position: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Trade value. 0 means no market value is available.
    #[serde(default)]
    pub value: f64,
}

impl Player {
    /// Parsed position, if recognized.
    pub fn parsed_position(&self) -> Option<Position> {
        Position::from_str_pos(&self.position)
    }

    /// Whether this player has a usable market value.
    pub fn has_value(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }

    /// Age in whole years. Uses the explicit `age` when present, otherwise
    /// derives it from `birth_date` relative to `as_of`.
    pub fn effective_age(&self, as_of: Option<NaiveDate>) -> Option<u32> {
        if self.age.is_some() {
            return self.age;
        }
        match (self.birth_date, as_of) {
            (Some(born), Some(today)) => age_on(born, today),
            _ => None,
        }
    }
}

/// Whole years elapsed between `born` and `today`. None if `today` is before `born`.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> Option<u32> {
    if today < born {
        return None;
    }
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// A future draft pick owned by a roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub season: u16,
    pub round: u8,
    /// The roster this pick originally belonged to, if traded.
    #[serde(default)]
    pub original_roster_id: Option<u32>,
    #[serde(default)]
    pub value: f64,
}

/// One team's state at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub players: Vec<Player>,
    /// Slot schema for this roster. Falls back to the league schema when absent.
    #[serde(default)]
    pub slots: Option<Vec<String>>,
    #[serde(default)]
    pub picks: Vec<DraftPick>,
    /// Best-week / max-points-for production signal, when the platform has one.
    #[serde(default)]
    pub max_points_for: Option<f64>,
}

impl RosterSnapshot {
    /// The slot labels this roster is scored against.
    pub fn slot_labels<'a>(&'a self, league: &'a LeagueSnapshot) -> &'a [String] {
        self.slots.as_deref().unwrap_or(&league.roster_positions)
    }
}

/// A full league snapshot: everything one scoring pass needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub league_id: String,
    #[serde(default)]
    pub name: String,
    /// League-level ordered slot labels (e.g. `["QB","RB","RB","WR","FLEX","BN"]`).
    #[serde(default)]
    pub roster_positions: Vec<String>,
    /// Reference date for deriving ages from birth dates.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    pub rosters: Vec<RosterSnapshot>,
    /// Per-request classifier threshold override.
    #[serde(default)]
    pub archetype: Option<ArchetypeConfig>,
    /// Per-request composite weight override.
    #[serde(default)]
    pub weights: Option<EdgeEngineWeights>,
}
