// Valuation primitives: age curves, percentile ranks, composite scoring.

pub mod age_curve;
pub mod composite;
pub mod percentile;
