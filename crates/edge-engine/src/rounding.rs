// Serde helpers that round numbers on the wire only. Structs keep full
// precision in memory; these run at serialization time.

use serde::Serializer;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn round1<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round_to(*value, 1))
}

pub fn round3_opt<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => s.serialize_some(&round_to(*v, 3)),
        None => s.serialize_none(),
    }
}
