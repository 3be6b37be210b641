// League scoring pass.
//
// Pipeline for one snapshot:
// 1. Resolve weights and classifier thresholds (request overrides win)
// 2. Per roster: ages, age-curve statuses, best lineup, raw axes
// 3. League replacement level, then depth
// 4. Percentiles for every axis against the fully built population
// 5. Composite score and rank, archetype, core assets, position needs

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::archetype::{self, Archetype, ArchetypeInputs, Reason};
use crate::assets::{self, CoreAsset, PositionNeed};
use crate::config::{ArchetypeConfig, ConfigError, EdgeEngineWeights, EngineConfig};
use crate::roster::{self, Lineup};
use crate::rounding::round1;
use crate::snapshot::{LeagueSnapshot, Player, RosterSnapshot};
use crate::valuation::age_curve;
use crate::valuation::composite::{self, AxisPercentiles, AxisRaw, WeightsError};
use crate::valuation::percentile::{optional_percentile_ranks, percentile_ranks};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid weights configuration: {0}")]
    InvalidWeights(#[from] WeightsError),

    #[error("invalid archetype configuration: {0}")]
    InvalidArchetypeConfig(#[source] ConfigError),
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// One axis for one team: raw aggregate, league percentile, and coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisScore {
    #[serde(serialize_with = "round1")]
    pub raw: f64,
    #[serde(serialize_with = "round1")]
    pub percentile: f64,
    #[serde(serialize_with = "round1")]
    pub coverage_pct: f64,
}

impl AxisScore {
    fn new(raw: AxisRaw, percentile: f64) -> Self {
        AxisScore {
            raw: raw.raw,
            percentile,
            coverage_pct: raw.coverage_pct,
        }
    }
}

/// Everything the dashboard shows for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterAxes {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    pub display_name: String,
    /// Starting lineup value.
    pub power: AxisScore,
    pub bench: AxisScore,
    pub depth: AxisScore,
    pub draft_capital: AxisScore,
    /// Value-weighted age-curve score.
    pub window: AxisScore,
    /// Present only when the roster reported a production signal.
    pub max_pf: Option<AxisScore>,
    #[serde(serialize_with = "round1")]
    pub composite: f64,
    /// 1-based rank by composite; ties keep input order.
    pub rank: usize,
    pub archetype: Archetype,
    pub reasons: Vec<Reason>,
    pub core_assets: Vec<CoreAsset>,
    pub position_needs: Vec<PositionNeed>,
}

/// Result of scoring one league.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueReport {
    pub league_id: String,
    pub superflex: bool,
    pub weights: EdgeEngineWeights,
    /// True when no weights were supplied and the default table was used.
    pub weights_defaulted: bool,
    /// League replacement value used for depth.
    #[serde(serialize_with = "round1")]
    pub replacement_value: f64,
    /// Teams in snapshot order.
    pub teams: Vec<RosterAxes>,
}

impl LeagueReport {
    /// Teams ordered by rank.
    pub fn ranked(&self) -> Vec<&RosterAxes> {
        let mut teams: Vec<&RosterAxes> = self.teams.iter().collect();
        teams.sort_by_key(|t| t.rank);
        teams
    }

    pub fn team(&self, roster_id: u32) -> Option<&RosterAxes> {
        self.teams.iter().find(|t| t.roster_id == roster_id)
    }
}

// ---------------------------------------------------------------------------
// Per-roster intermediate
// ---------------------------------------------------------------------------

/// Raw, population-independent numbers for one roster.
struct RosterRaw<'a> {
    players: &'a [Player],
    ages: Vec<Option<u32>>,
    starter_slots: usize,
    starters: AxisRaw,
    bench: AxisRaw,
    picks: AxisRaw,
    window: AxisRaw,
    max_pf: Option<f64>,
}

fn build_roster_raw<'a>(
    snapshot: &'a LeagueSnapshot,
    roster: &'a RosterSnapshot,
    config: &EngineConfig,
) -> RosterRaw<'a> {
    let players = roster.players.as_slice();
    let labels = roster.slot_labels(snapshot);
    let ages: Vec<Option<u32>> = players
        .iter()
        .map(|p| p.effective_age(snapshot.as_of))
        .collect();
    let age_scores: Vec<f64> = players
        .iter()
        .zip(&ages)
        .map(|(p, &age)| age_curve::status(&p.position, age, &config.age_curve).score)
        .collect();

    let lineup = Lineup::assign(players, labels);

    RosterRaw {
        players,
        starter_slots: lineup.starter_count(),
        starters: composite::starters_axis(players, &lineup),
        bench: composite::bench_axis(players, &lineup),
        picks: composite::picks_axis(&roster.picks),
        window: composite::value_weighted_window(players, &age_scores),
        max_pf: roster.max_points_for.filter(|v| v.is_finite()),
        ages,
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score a league using the overrides carried on the snapshot itself, falling
/// back to `config` for thresholds and the default weight table.
pub fn score_snapshot(snapshot: &LeagueSnapshot, config: &EngineConfig) -> Result<LeagueReport, EngineError> {
    let mut effective = config.clone();
    if let Some(archetype) = snapshot.archetype {
        effective.archetype = archetype;
    }
    score_league(snapshot, &effective, snapshot.weights.as_ref())
}

/// Score every roster in `snapshot`.
///
/// `weights` are the caller's composite weights; `None` substitutes the
/// configured default table (`config.weights`) and sets `weights_defaulted`
/// on the report.
pub fn score_league(
    snapshot: &LeagueSnapshot,
    config: &EngineConfig,
    weights: Option<&EdgeEngineWeights>,
) -> Result<LeagueReport, EngineError> {
    let resolved = composite::resolve_weights_or(weights, &config.weights)?;
    validate_archetype(&config.archetype)?;

    let superflex = roster::is_superflex_from_positions(&snapshot.roster_positions);

    let raws: Vec<RosterRaw> = snapshot
        .rosters
        .iter()
        .map(|r| build_roster_raw(snapshot, r, config))
        .collect();

    // Depth needs the whole league first.
    let starting_spots: usize = raws.iter().map(|r| r.starter_slots).sum();
    let replacement = composite::replacement_value(
        snapshot.rosters.iter().flat_map(|r| r.players.iter()),
        starting_spots,
    );
    let depth: Vec<AxisRaw> = raws
        .iter()
        .map(|r| composite::depth_axis(r.players, replacement))
        .collect();

    // Populations are complete before any rank is taken.
    let power_pct = percentile_ranks(&column(&raws, |r| r.starters.raw));
    let bench_pct = percentile_ranks(&column(&raws, |r| r.bench.raw));
    let picks_pct = percentile_ranks(&column(&raws, |r| r.picks.raw));
    let window_pct = percentile_ranks(&column(&raws, |r| r.window.raw));
    let depth_pct = percentile_ranks(&depth.iter().map(|d| d.raw).collect::<Vec<_>>());
    let max_pf_pct = optional_percentile_ranks(&raws.iter().map(|r| r.max_pf).collect::<Vec<_>>());

    let composites: Vec<f64> = (0..raws.len())
        .map(|i| {
            let pcts = AxisPercentiles {
                starters: power_pct[i],
                bench: bench_pct[i],
                picks: picks_pct[i],
                depth: depth_pct[i],
                age: window_pct[i],
            };
            composite::composite_score(&pcts, &resolved.weights)
        })
        .collect();
    let ranks = rank_descending(&composites);

    let need_input: Vec<(u32, &[Player])> = snapshot
        .rosters
        .iter()
        .map(|r| (r.roster_id, r.players.as_slice()))
        .collect();
    let mut needs = assets::position_needs(&need_input, &config.needs);

    let mut teams = Vec::with_capacity(raws.len());
    for (i, (roster, raw)) in snapshot.rosters.iter().zip(&raws).enumerate() {
        let inputs = ArchetypeInputs {
            power: power_pct[i],
            window: window_pct[i],
            draft: picks_pct[i],
            max_pf: max_pf_pct[i],
        };
        let classification = archetype::classify(&inputs, &config.archetype);

        debug!(
            "Roster {} ({}): power={:.1} window={:.1} draft={:.1} composite={:.1} -> {}",
            roster.roster_id,
            roster.display_name,
            inputs.power,
            inputs.window,
            inputs.draft,
            composites[i],
            classification.archetype.label()
        );

        teams.push(RosterAxes {
            roster_id: roster.roster_id,
            owner_id: roster.owner_id.clone(),
            display_name: roster.display_name.clone(),
            power: AxisScore::new(raw.starters, power_pct[i]),
            bench: AxisScore::new(raw.bench, bench_pct[i]),
            depth: AxisScore::new(depth[i], depth_pct[i]),
            draft_capital: AxisScore::new(raw.picks, picks_pct[i]),
            window: AxisScore::new(raw.window, window_pct[i]),
            max_pf: raw.max_pf.zip(max_pf_pct[i]).map(|(value, pct)| AxisScore {
                raw: value,
                percentile: pct,
                coverage_pct: 100.0,
            }),
            composite: composites[i],
            rank: ranks[i],
            archetype: classification.archetype,
            reasons: classification.reasons,
            core_assets: assets::core_assets(raw.players, &raw.ages, raw.starter_slots, &config.age_curve),
            position_needs: std::mem::take(&mut needs[i]),
        });
    }

    info!(
        "Scored league {}: {} teams, superflex={}, replacement value {:.1}",
        snapshot.league_id,
        teams.len(),
        superflex,
        replacement
    );

    Ok(LeagueReport {
        league_id: snapshot.league_id.clone(),
        superflex,
        weights: resolved.weights,
        weights_defaulted: resolved.defaulted,
        replacement_value: replacement,
        teams,
    })
}

fn column(raws: &[RosterRaw<'_>], f: impl Fn(&RosterRaw<'_>) -> f64) -> Vec<f64> {
    raws.iter().map(f).collect()
}

fn validate_archetype(config: &ArchetypeConfig) -> Result<(), EngineError> {
    config.validate().map_err(EngineError::InvalidArchetypeConfig)
}

/// 1-based ranks, highest score first. Equal scores keep input order.
fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut ranks = vec![0; scores.len()];
    for (pos, idx) in order.into_iter().enumerate() {
        ranks[idx] = pos + 1;
    }
    ranks
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
