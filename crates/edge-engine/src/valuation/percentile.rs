// Percentile ranks across a league population.

/// Rank returned when a population is too small to have any spread.
pub const NEUTRAL_PERCENTILE: f64 = 50.0;

/// Percentile rank of `value` within `population`, 0-100.
///
/// Defined as `100 * (members strictly less than value) / n`. Ties share the
/// rank of the lowest tied value. Empty and single-member populations return
/// `NEUTRAL_PERCENTILE`.
pub fn percentile_rank(population: &[f64], value: f64) -> f64 {
    if population.len() < 2 {
        return NEUTRAL_PERCENTILE;
    }
    let below = population.iter().filter(|&&p| p < value).count();
    100.0 * below as f64 / population.len() as f64
}

/// Percentile rank of every member of `population` against the whole population.
pub fn percentile_ranks(population: &[f64]) -> Vec<f64> {
    population
        .iter()
        .map(|&v| percentile_rank(population, v))
        .collect()
}

/// Like `percentile_ranks`, but members that are `None` are left out of the
/// population and get `None` back.
pub fn optional_percentile_ranks(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    values
        .iter()
        .map(|v| v.map(|x| percentile_rank(&present, x)))
        .collect()
}
