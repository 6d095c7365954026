//! Ordered-partition window primitive.
//!
//! Rows are partitioned by a key extractor and ordered within each partition
//! by an ordering value. Ordering is made total by a documented secondary
//! key: the row's original position in the input slice. SQL leaves intra-tie
//! order unspecified; here it is pinned so every run is reproducible.
//!
//! Output rows carry the partition key, the original row index, and the
//! computed value, emitted partitions-ascending then sort-order within each
//! partition.

use crate::error::EngineError;
use chrono::{DateTime, Duration, Utc};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// How tied metric values are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMethod {
    /// SQL `RANK()`: ties share a rank, the next distinct value skips ahead
    /// by the tie count.
    Competition,
    /// SQL `DENSE_RANK()`: ties share a rank, no gaps.
    Dense,
}

/// One output row of a window operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowRow<P, V> {
    pub partition: P,
    /// Original position of the row in the input slice.
    pub row: usize,
    pub value: V,
}

fn partition_indices<R, P>(
    rows: &[R],
    partition_fn: impl Fn(&R) -> P,
) -> BTreeMap<P, Vec<usize>>
where
    P: Ord,
{
    let mut partitions: BTreeMap<P, Vec<usize>> = BTreeMap::new();
    for (index, row) in rows.iter().enumerate() {
        partitions.entry(partition_fn(row)).or_default().push(index);
    }
    partitions
}

/// Ranks rows within each partition by a metric, descending.
///
/// Ranks are 1-based. Equal metric values receive equal rank; see
/// [`RankMethod`] for how the next distinct value is numbered. Tied rows are
/// emitted in original row order.
pub fn rank<R, P>(
    rows: &[R],
    partition_fn: impl Fn(&R) -> P,
    metric_fn: impl Fn(&R) -> f64,
    method: RankMethod,
) -> Vec<WindowRow<P, u64>>
where
    P: Ord + Clone,
{
    let mut output = Vec::with_capacity(rows.len());
    for (partition, mut indices) in partition_indices(rows, partition_fn) {
        indices.sort_by_key(|&index| (Reverse(OrderedFloat(metric_fn(&rows[index]))), index));

        let mut previous_metric: Option<OrderedFloat<f64>> = None;
        let mut previous_rank = 0u64;
        for (position, &index) in indices.iter().enumerate() {
            let metric = OrderedFloat(metric_fn(&rows[index]));
            let rank = match previous_metric {
                Some(prev) if prev == metric => previous_rank,
                _ => match method {
                    RankMethod::Competition => position as u64 + 1,
                    RankMethod::Dense => previous_rank + 1,
                },
            };
            previous_metric = Some(metric);
            previous_rank = rank;
            output.push(WindowRow {
                partition: partition.clone(),
                row: index,
                value: rank,
            });
        }
    }
    output
}

/// Cumulative (unbounded-preceding) sum of a metric per partition, ordered
/// by `order_fn` with original row position breaking ties.
pub fn running_sum<R, P, O>(
    rows: &[R],
    partition_fn: impl Fn(&R) -> P,
    order_fn: impl Fn(&R) -> O,
    metric_fn: impl Fn(&R) -> f64,
) -> Vec<WindowRow<P, f64>>
where
    P: Ord + Clone,
    O: Ord,
{
    let mut output = Vec::with_capacity(rows.len());
    for (partition, mut indices) in partition_indices(rows, partition_fn) {
        indices.sort_by_key(|&index| (order_fn(&rows[index]), index));
        let mut total = 0.0;
        for &index in &indices {
            total += metric_fn(&rows[index]);
            output.push(WindowRow {
                partition: partition.clone(),
                row: index,
                value: total,
            });
        }
    }
    output
}

/// Trailing-window sum: the current row plus up to `window - 1` immediately
/// preceding rows in the partition's sort order. Rows early in a partition
/// sum over the shorter prefix that exists.
pub fn trailing_sum<R, P, O>(
    rows: &[R],
    partition_fn: impl Fn(&R) -> P,
    order_fn: impl Fn(&R) -> O,
    metric_fn: impl Fn(&R) -> f64,
    window: usize,
) -> Result<Vec<WindowRow<P, f64>>, EngineError>
where
    P: Ord + Clone,
    O: Ord,
{
    if window == 0 {
        return Err(EngineError::ZeroWindow);
    }

    let mut output = Vec::with_capacity(rows.len());
    for (partition, mut indices) in partition_indices(rows, partition_fn) {
        indices.sort_by_key(|&index| (order_fn(&rows[index]), index));
        let values: Vec<f64> = indices.iter().map(|&index| metric_fn(&rows[index])).collect();

        for (position, &index) in indices.iter().enumerate() {
            let start = if position + 1 < window {
                0
            } else {
                position + 1 - window
            };
            let value = values[start..=position].iter().sum();
            output.push(WindowRow {
                partition: partition.clone(),
                row: index,
                value,
            });
        }
    }
    Ok(output)
}

/// Difference between each row's timestamp and its predecessor's within the
/// partition, ordered by timestamp (row position breaking ties).
///
/// The first row of every partition has no predecessor and yields `None`.
pub fn lag_delta<R, P>(
    rows: &[R],
    partition_fn: impl Fn(&R) -> P,
    order_fn: impl Fn(&R) -> DateTime<Utc>,
) -> Vec<WindowRow<P, Option<Duration>>>
where
    P: Ord + Clone,
{
    let mut output = Vec::with_capacity(rows.len());
    for (partition, mut indices) in partition_indices(rows, partition_fn) {
        indices.sort_by_key(|&index| (order_fn(&rows[index]), index));
        let mut previous: Option<DateTime<Utc>> = None;
        for &index in &indices {
            let timestamp = order_fn(&rows[index]);
            output.push(WindowRow {
                partition: partition.clone(),
                row: index,
                value: previous.map(|prev| timestamp - prev),
            });
            previous = Some(timestamp);
        }
    }
    output
}
