// Position-relative age curves.
//
// Maps (position, age) to a lifecycle zone and a 0-100 score of how much
// long-term value a player has left. Total over every input: a missing age
// or a position without a configured window yields `AgeZone::Unknown`.

use serde::{Deserialize, Serialize};

use crate::config::{AgeCurveConfig, AgeWindow};
use crate::roster::position::Position;
use crate::rounding::{round1, round3_opt};

/// Score given to players whose zone can't be determined.
pub const UNKNOWN_SCORE: f64 = 50.0;

/// Score at the edges of the prime window; the midpoint scores 100.
const PRIME_EDGE_SCORE: f64 = 85.0;
/// Points lost per year before the prime window.
const ASCENT_STEP: f64 = 5.0;
const ASCENT_FLOOR: f64 = 60.0;
/// Decline runs from the first year past prime down to the year before the cliff.
const DECLINE_START_SCORE: f64 = 70.0;
const DECLINE_END_SCORE: f64 = 30.0;
const CLIFF_SCORE: f64 = 20.0;
const CLIFF_STEP: f64 = 5.0;

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// Where a player sits on their position's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeZone {
    Ascent,
    Prime,
    Decline,
    Cliff,
    Unknown,
}

impl AgeZone {
    pub fn label(&self) -> &'static str {
        match self {
            AgeZone::Ascent => "Ascent",
            AgeZone::Prime => "Prime",
            AgeZone::Decline => "Decline",
            AgeZone::Cliff => "Cliff",
            AgeZone::Unknown => "Unknown",
        }
    }

    /// Presentation color tag. Depends on nothing but the zone.
    pub fn color(&self) -> ZoneColor {
        match self {
            AgeZone::Ascent => ZoneColor::Blue,
            AgeZone::Prime => ZoneColor::Green,
            AgeZone::Decline => ZoneColor::Amber,
            AgeZone::Cliff => ZoneColor::Red,
            AgeZone::Unknown => ZoneColor::Gray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneColor {
    Blue,
    Green,
    Amber,
    Red,
    Gray,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Age-curve reading for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeCurveStatus {
    pub age: Option<u32>,
    /// Position label used for the window lookup ("RB", or the raw
    /// uppercased string for positions we don't recognize).
    pub position_bucket: String,
    pub zone: AgeZone,
    #[serde(serialize_with = "round1")]
    pub score: f64,
    /// (prime_start, prime_end), or None when the position has no window.
    pub prime_window: Option<(u32, u32)>,
    /// Marker position on the age bar, 0-1. None when age is unknown.
    #[serde(serialize_with = "round3_opt")]
    pub dot_pct: Option<f64>,
    pub color: ZoneColor,
}

/// Normalize a raw position string into the bucket used for window lookup.
pub fn position_bucket(position: &str) -> String {
    match Position::from_str_pos(position) {
        Some(pos) => pos.display_str().to_string(),
        None => position.trim().to_uppercase(),
    }
}

/// Age-curve status for a player at `position` aged `age`.
pub fn status(position: &str, age: Option<u32>, config: &AgeCurveConfig) -> AgeCurveStatus {
    let bucket = position_bucket(position);
    let window = config.windows.get(&bucket).copied();
    let dot_pct = age.map(|a| dot_pct(a, config));

    let (zone, score) = match (age, window) {
        (Some(a), Some(w)) => zone_and_score(a, &w),
        _ => (AgeZone::Unknown, UNKNOWN_SCORE),
    };

    AgeCurveStatus {
        age,
        position_bucket: bucket,
        zone,
        score,
        prime_window: window.map(|w| (w.prime_start, w.prime_end)),
        dot_pct,
        color: zone.color(),
    }
}

/// Zone and score for a known age against a known window.
pub fn zone_and_score(age: u32, window: &AgeWindow) -> (AgeZone, f64) {
    let age_f = age as f64;
    let start = window.prime_start;
    let end = window.prime_end;
    let cliff = window.cliff_age;

    if age < start {
        let years_out = (start - age) as f64;
        let score = (PRIME_EDGE_SCORE - ASCENT_STEP * years_out).max(ASCENT_FLOOR);
        (AgeZone::Ascent, score)
    } else if age <= end {
        let half_width = (end - start) as f64 / 2.0;
        if half_width == 0.0 {
            return (AgeZone::Prime, 100.0);
        }
        let mid = (start + end) as f64 / 2.0;
        let off_center = (age_f - mid).abs() / half_width;
        (AgeZone::Prime, 100.0 - (100.0 - PRIME_EDGE_SCORE) * off_center)
    } else if age < cliff {
        // Number of decline ages, at least 1 here.
        let decline_years = cliff - end - 1;
        let into_decline = (age - end - 1) as f64;
        let score = if decline_years <= 1 {
            DECLINE_START_SCORE
        } else {
            DECLINE_START_SCORE
                - (DECLINE_START_SCORE - DECLINE_END_SCORE) * into_decline
                    / (decline_years - 1) as f64
        };
        (AgeZone::Decline, score)
    } else {
        let years_past = (age - cliff) as f64;
        (AgeZone::Cliff, (CLIFF_SCORE - CLIFF_STEP * years_past).max(0.0))
    }
}

/// Monotonic, clamped mapping of age onto the displayed age range.
pub fn dot_pct(age: u32, config: &AgeCurveConfig) -> f64 {
    let min = config.display_min_age as f64;
    let max = config.display_max_age as f64;
    if max <= min {
        return 0.0;
    }
    ((age as f64 - min) / (max - min)).clamp(0.0, 1.0)
}
