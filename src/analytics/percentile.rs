//! Continuous (linear-interpolated) percentile primitive.

use crate::error::EngineError;
use ordered_float::OrderedFloat;

/// Computes the continuous `p`-th percentile of `values`.
///
/// Standard `PERCENTILE_CONT` definition: sort the values, locate the
/// fractional rank `p * (n - 1)`, and linearly interpolate between the two
/// bracketing order statistics. For a single value the result is that value.
///
/// Returns `Ok(None)` for an empty input (an undefined result, not an
/// error) and `Err` when `p` lies outside `[0, 1]`.
pub fn percentile_cont(values: &[f64], p: f64) -> Result<Option<f64>, EngineError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(EngineError::InvalidPercentile(p));
    }
    if values.is_empty() {
        return Ok(None);
    }

    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort();

    let fractional_rank = p * (sorted.len() - 1) as f64;
    let lower = fractional_rank.floor() as usize;
    let upper = fractional_rank.ceil() as usize;
    let lower_value = sorted[lower].into_inner();
    let upper_value = sorted[upper].into_inner();
    let fraction = fractional_rank - lower as f64;

    Ok(Some(lower_value + (upper_value - lower_value) * fraction))
}

/// Returns the keys whose metric is strictly greater than the `p`-th
/// percentile of all metrics, in input order.
///
/// Strict comparison means an entity sitting exactly on the threshold is
/// excluded; this is the "top 20% spenders" classification with `p = 0.8`.
pub fn above_percentile<K: Clone>(
    pairs: &[(K, f64)],
    p: f64,
) -> Result<Vec<K>, EngineError> {
    let values: Vec<f64> = pairs.iter().map(|(_, value)| *value).collect();
    let threshold = match percentile_cont(&values, p)? {
        Some(threshold) => threshold,
        None => return Ok(Vec::new()),
    };
    Ok(pairs
        .iter()
        .filter(|(_, value)| *value > threshold)
        .map(|(key, _)| key.clone())
        .collect())
}
