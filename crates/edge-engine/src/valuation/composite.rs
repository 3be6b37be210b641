// Per-team raw axis metrics and the weighted composite score.

use thiserror::Error;
use tracing::warn;

use crate::config::{AgeCurveConfig, EdgeEngineWeights, DEFAULT_WEIGHTS};
use crate::roster::Lineup;
use crate::snapshot::{DraftPick, Player};
use crate::valuation::age_curve;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("weight `{axis}` must be a finite number, got {value}")]
    NonFinite { axis: &'static str, value: f64 },

    #[error("weight `{axis}` must not be negative, got {value}")]
    Negative { axis: &'static str, value: f64 },

    #[error("weights must not all be zero")]
    ZeroSum,
}

/// The weights a scoring pass ends up using.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedWeights {
    pub weights: EdgeEngineWeights,
    /// True when the caller passed no weights and the default table was used.
    pub defaulted: bool,
}

/// Check caller weights before they reach the scorer.
pub fn validate_weights(weights: &EdgeEngineWeights) -> Result<(), WeightsError> {
    for (axis, value) in weights.fields() {
        if !value.is_finite() {
            return Err(WeightsError::NonFinite { axis, value });
        }
        if value < 0.0 {
            return Err(WeightsError::Negative { axis, value });
        }
    }
    if weights.total() <= 0.0 {
        return Err(WeightsError::ZeroSum);
    }
    Ok(())
}

/// Use the caller's weights if given (after validation), otherwise the
/// documented default table. The substitution is logged and flagged.
pub fn resolve_weights(weights: Option<&EdgeEngineWeights>) -> Result<ResolvedWeights, WeightsError> {
    resolve_weights_or(weights, &DEFAULT_WEIGHTS)
}

/// Like `resolve_weights`, with a configured table standing in for the
/// built-in defaults.
pub fn resolve_weights_or(
    weights: Option<&EdgeEngineWeights>,
    fallback: &EdgeEngineWeights,
) -> Result<ResolvedWeights, WeightsError> {
    match weights {
        Some(w) => {
            validate_weights(w)?;
            Ok(ResolvedWeights {
                weights: *w,
                defaulted: false,
            })
        }
        None => {
            validate_weights(fallback)?;
            warn!("No composite weights supplied; using default weight table");
            Ok(ResolvedWeights {
                weights: *fallback,
                defaulted: true,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

/// Percentile ranks for the five weighted axes of one team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPercentiles {
    pub starters: f64,
    pub bench: f64,
    pub picks: f64,
    pub depth: f64,
    pub age: f64,
}

/// Weighted mean of the axis percentiles. Returns 0.0 when the weights sum
/// to zero.
pub fn composite_score(pcts: &AxisPercentiles, weights: &EdgeEngineWeights) -> f64 {
    let total = weights.total();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted = pcts.starters * weights.starters
        + pcts.bench * weights.bench
        + pcts.picks * weights.picks
        + pcts.depth * weights.depth
        + pcts.age * weights.age;
    weighted / total
}

// ---------------------------------------------------------------------------
// Raw axes
// ---------------------------------------------------------------------------

/// A raw aggregate plus the share of the roster it could be computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRaw {
    pub raw: f64,
    pub coverage_pct: f64,
}

impl AxisRaw {
    pub const EMPTY: AxisRaw = AxisRaw {
        raw: 0.0,
        coverage_pct: 0.0,
    };
}

fn pct_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Share of the roster with a market value.
fn valued_coverage(players: &[Player]) -> f64 {
    pct_of(players.iter().filter(|p| p.has_value()).count(), players.len())
}

/// Value-weighted age-curve score (the "window" axis).
///
/// Only players with a value participate, in both numerator and denominator.
/// With nobody eligible both fields are 0.
pub fn value_weighted_window(players: &[Player], age_scores: &[f64]) -> AxisRaw {
    let mut weighted = 0.0;
    let mut total_value = 0.0;
    let mut eligible = 0;
    for (p, &score) in players.iter().zip(age_scores) {
        if !p.has_value() {
            continue;
        }
        weighted += p.value * score;
        total_value += p.value;
        eligible += 1;
    }
    if eligible == 0 || total_value <= 0.0 {
        return AxisRaw::EMPTY;
    }
    AxisRaw {
        raw: weighted / total_value,
        coverage_pct: pct_of(eligible, players.len()),
    }
}

/// `value_weighted_window` with age scores taken straight from the age curve.
pub fn compute_value_weighted_window(
    players: &[Player],
    ages: &[Option<u32>],
    config: &AgeCurveConfig,
) -> AxisRaw {
    let scores: Vec<f64> = players
        .iter()
        .zip(ages)
        .map(|(p, &age)| age_curve::status(&p.position, age, config).score)
        .collect();
    value_weighted_window(players, &scores)
}

/// Starting lineup value; coverage is the share of starting slots filled.
pub fn starters_axis(players: &[Player], lineup: &Lineup) -> AxisRaw {
    AxisRaw {
        raw: lineup.value(players),
        coverage_pct: pct_of(lineup.filled_count(), lineup.starter_count()),
    }
}

/// Value of valued players outside the starting lineup.
pub fn bench_axis(players: &[Player], lineup: &Lineup) -> AxisRaw {
    let raw = players
        .iter()
        .enumerate()
        .filter(|(i, p)| p.has_value() && !lineup.is_starter(*i))
        .map(|(_, p)| p.value)
        .sum();
    AxisRaw {
        raw,
        coverage_pct: valued_coverage(players),
    }
}

/// Total value of owned draft picks.
pub fn picks_axis(picks: &[DraftPick]) -> AxisRaw {
    let valued: Vec<&DraftPick> = picks
        .iter()
        .filter(|p| p.value.is_finite() && p.value > 0.0)
        .collect();
    AxisRaw {
        raw: valued.iter().map(|p| p.value).sum(),
        coverage_pct: pct_of(valued.len(), picks.len()),
    }
}

/// Number of players at or above the league replacement value.
pub fn depth_axis(players: &[Player], replacement_value: f64) -> AxisRaw {
    let startable = players
        .iter()
        .filter(|p| p.has_value() && p.value >= replacement_value)
        .count();
    AxisRaw {
        raw: startable as f64,
        coverage_pct: valued_coverage(players),
    }
}

/// Value of the Nth best valued player league-wide, N = `starting_spots`.
///
/// Falls back to the lowest valued player when the league has fewer valued
/// players than starting spots, and to 0 when nobody has a value.
pub fn replacement_value<'a, I>(all_players: I, starting_spots: usize) -> f64
where
    I: IntoIterator<Item = &'a Player>,
{
    let mut values: Vec<f64> = all_players
        .into_iter()
        .filter(|p| p.has_value())
        .map(|p| p.value)
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let idx = starting_spots.clamp(1, values.len()) - 1;
    values[idx]
}
