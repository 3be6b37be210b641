// Core assets and positional surplus/need analysis.
//
// Core assets are a roster's most valuable players. Position needs compare
// each team's value at a position against the rest of the league, which is
// what drives trade targeting: a shallow team is pointed at the teams with a
// surplus at the same spot.

use serde::Serialize;

use crate::config::{AgeCurveConfig, NeedsConfig};
use crate::roster::position::{Position, NEED_POSITIONS};
use crate::rounding::round1;
use crate::snapshot::Player;
use crate::valuation::age_curve::{self, AgeCurveStatus};
use crate::valuation::percentile::percentile_rank;

/// Hard cap on core assets regardless of lineup size.
pub const MAX_CORE_ASSETS: usize = 12;
/// Core assets beyond the number of starting slots.
pub const CORE_ASSET_EXTRA: usize = 3;

// ---------------------------------------------------------------------------
// Core assets
// ---------------------------------------------------------------------------

/// How many core assets a roster format gets.
pub fn core_asset_count(starter_slot_count: usize) -> usize {
    MAX_CORE_ASSETS.min(starter_slot_count + CORE_ASSET_EXTRA)
}

/// Indices of the top `core_asset_count(starter_slot_count)` players by value,
/// descending.
///
/// The sort is stable: players with equal value keep their input order.
fn core_asset_indices(players: &[Player], starter_slot_count: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..players.len()).collect();
    ranked.sort_by(|&a, &b| {
        players[b]
            .value
            .partial_cmp(&players[a].value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(core_asset_count(starter_slot_count));
    ranked
}

/// The top `core_asset_count(starter_slot_count)` players by value, descending.
pub fn select_core_assets(players: &[Player], starter_slot_count: usize) -> Vec<&Player> {
    core_asset_indices(players, starter_slot_count)
        .into_iter()
        .map(|i| &players[i])
        .collect()
}

/// A core asset as reported to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreAsset {
    pub player_id: String,
    pub full_name: String,
    pub position: String,
    #[serde(serialize_with = "round1")]
    pub value: f64,
    pub age_curve: AgeCurveStatus,
}

/// Core assets with their age-curve status attached. `ages` is parallel to `players`.
pub fn core_assets(
    players: &[Player],
    ages: &[Option<u32>],
    starter_slot_count: usize,
    config: &AgeCurveConfig,
) -> Vec<CoreAsset> {
    core_asset_indices(players, starter_slot_count)
        .into_iter()
        .map(|i| {
            let p = &players[i];
            let age = ages.get(i).copied().flatten();
            CoreAsset {
                player_id: p.player_id.clone(),
                full_name: p.full_name.clone(),
                position: p.position.clone(),
                value: p.value,
                age_curve: age_curve::status(&p.position, age, config),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Position needs
// ---------------------------------------------------------------------------

/// How a team's depth at a position compares to the league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NeedLevel {
    Surplus,
    Balanced,
    Shallow,
}

impl NeedLevel {
    pub fn from_percentile(pct: f64, config: &NeedsConfig) -> Self {
        if pct >= config.surplus_min {
            NeedLevel::Surplus
        } else if pct < config.shallow_max {
            NeedLevel::Shallow
        } else {
            NeedLevel::Balanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NeedLevel::Surplus => "SURPLUS",
            NeedLevel::Balanced => "BALANCED",
            NeedLevel::Shallow => "SHALLOW",
        }
    }
}

/// One position's standing for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionNeed {
    pub position: Position,
    /// Total value the team holds at this position.
    #[serde(serialize_with = "round1")]
    pub value: f64,
    /// Players on the roster at this position.
    pub count: usize,
    #[serde(serialize_with = "round1")]
    pub percentile: f64,
    pub level: NeedLevel,
    /// For shallow positions: roster ids with a surplus at the same position.
    pub trade_partners: Vec<u32>,
}

/// Total value and head count at `pos`.
fn position_holdings(players: &[Player], pos: Position) -> (f64, usize) {
    players
        .iter()
        .filter(|p| p.parsed_position() == Some(pos))
        .fold((0.0, 0), |(value, count), p| {
            let v = if p.has_value() { p.value } else { 0.0 };
            (value + v, count + 1)
        })
}

/// Position needs for every team, parallel to `rosters`.
///
/// Each entry of `rosters` is `(roster_id, players)`.
pub fn position_needs(rosters: &[(u32, &[Player])], config: &NeedsConfig) -> Vec<Vec<PositionNeed>> {
    let mut out: Vec<Vec<PositionNeed>> = vec![Vec::with_capacity(NEED_POSITIONS.len()); rosters.len()];

    for &pos in NEED_POSITIONS {
        let holdings: Vec<(f64, usize)> = rosters
            .iter()
            .map(|(_, players)| position_holdings(players, pos))
            .collect();
        let population: Vec<f64> = holdings.iter().map(|(v, _)| *v).collect();
        let levels: Vec<(f64, NeedLevel)> = population
            .iter()
            .map(|&v| {
                let pct = percentile_rank(&population, v);
                (pct, NeedLevel::from_percentile(pct, config))
            })
            .collect();
        let surplus_teams: Vec<u32> = rosters
            .iter()
            .zip(&levels)
            .filter(|(_, (_, level))| *level == NeedLevel::Surplus)
            .map(|((id, _), _)| *id)
            .collect();

        for (i, ((roster_id, _), &(value, count))) in rosters.iter().zip(&holdings).enumerate() {
            let (percentile, level) = levels[i];
            let trade_partners = if level == NeedLevel::Shallow {
                surplus_teams
                    .iter()
                    .copied()
                    .filter(|id| id != roster_id)
                    .collect()
            } else {
                Vec::new()
            };
            out[i].push(PositionNeed {
                position: pos,
                value,
                count,
                percentile,
                level,
                trade_partners,
            });
        }
    }

    out
}
