//! Filter/group/aggregate primitive.
//!
//! An [`Aggregate`] is a cloneable accumulator prototype; grouping clones it
//! once per group and folds matching rows in a single pass. Tuples of
//! aggregates compose, so multi-metric output (say, completed and canceled
//! counts together) never needs a second scan.

use serde::Serialize;
use std::collections::BTreeMap;

/// Single-pass accumulator over rows of type `R`.
pub trait Aggregate<R>: Clone {
    type Output;

    fn update(&mut self, row: &R);

    fn finish(self) -> Self::Output;
}

/// One output row of [`group_aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow<K, V> {
    pub key: K,
    pub value: V,
}

/// Filters rows, groups them by `key_fn`, and folds each group with a clone
/// of `prototype`.
///
/// Output is ordered ascending by group key (composite keys are tuples,
/// compared lexicographically), which makes repeated runs byte-identical.
/// Float-valued keys must be wrapped in `ordered_float::OrderedFloat` by the
/// caller to satisfy `Ord`.
pub fn group_aggregate<R, K, A>(
    rows: &[R],
    filter: impl Fn(&R) -> bool,
    key_fn: impl Fn(&R) -> K,
    prototype: A,
) -> Vec<GroupRow<K, A::Output>>
where
    K: Ord,
    A: Aggregate<R>,
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for row in rows {
        if !filter(row) {
            continue;
        }
        groups
            .entry(key_fn(row))
            .or_insert_with(|| prototype.clone())
            .update(row);
    }
    groups
        .into_iter()
        .map(|(key, accumulator)| GroupRow {
            key,
            value: accumulator.finish(),
        })
        .collect()
}

/// Row count.
#[derive(Debug, Clone, Default)]
pub struct Count {
    n: u64,
}

pub fn count() -> Count {
    Count::default()
}

impl<R> Aggregate<R> for Count {
    type Output = u64;

    fn update(&mut self, _row: &R) {
        self.n += 1;
    }

    fn finish(self) -> u64 {
        self.n
    }
}

/// Count of rows matching a predicate.
#[derive(Debug, Clone)]
pub struct CountIf<F> {
    n: u64,
    predicate: F,
}

pub fn count_if<R, F>(predicate: F) -> CountIf<F>
where
    F: Fn(&R) -> bool + Clone,
{
    CountIf { n: 0, predicate }
}

impl<R, F> Aggregate<R> for CountIf<F>
where
    F: Fn(&R) -> bool + Clone,
{
    type Output = u64;

    fn update(&mut self, row: &R) {
        if (self.predicate)(row) {
            self.n += 1;
        }
    }

    fn finish(self) -> u64 {
        self.n
    }
}

/// Sum of a metric.
#[derive(Debug, Clone)]
pub struct Sum<F> {
    total: f64,
    metric: F,
}

pub fn sum<R, F>(metric: F) -> Sum<F>
where
    F: Fn(&R) -> f64 + Clone,
{
    Sum { total: 0.0, metric }
}

impl<R, F> Aggregate<R> for Sum<F>
where
    F: Fn(&R) -> f64 + Clone,
{
    type Output = f64;

    fn update(&mut self, row: &R) {
        self.total += (self.metric)(row);
    }

    fn finish(self) -> f64 {
        self.total
    }
}

/// Arithmetic mean of a metric; `None` when no rows were folded.
#[derive(Debug, Clone)]
pub struct Mean<F> {
    total: f64,
    n: u64,
    metric: F,
}

pub fn mean<R, F>(metric: F) -> Mean<F>
where
    F: Fn(&R) -> f64 + Clone,
{
    Mean {
        total: 0.0,
        n: 0,
        metric,
    }
}

impl<R, F> Aggregate<R> for Mean<F>
where
    F: Fn(&R) -> f64 + Clone,
{
    type Output = Option<f64>;

    fn update(&mut self, row: &R) {
        self.total += (self.metric)(row);
        self.n += 1;
    }

    fn finish(self) -> Option<f64> {
        if self.n == 0 {
            None
        } else {
            Some(self.total / self.n as f64)
        }
    }
}

/// Minimum of a metric; `None` when no rows were folded.
#[derive(Debug, Clone)]
pub struct Min<F> {
    best: Option<f64>,
    metric: F,
}

pub fn min_of<R, F>(metric: F) -> Min<F>
where
    F: Fn(&R) -> f64 + Clone,
{
    Min { best: None, metric }
}

impl<R, F> Aggregate<R> for Min<F>
where
    F: Fn(&R) -> f64 + Clone,
{
    type Output = Option<f64>;

    fn update(&mut self, row: &R) {
        let value = (self.metric)(row);
        self.best = Some(match self.best {
            Some(best) if best <= value => best,
            _ => value,
        });
    }

    fn finish(self) -> Option<f64> {
        self.best
    }
}

/// Maximum of a metric; `None` when no rows were folded.
#[derive(Debug, Clone)]
pub struct Max<F> {
    best: Option<f64>,
    metric: F,
}

pub fn max_of<R, F>(metric: F) -> Max<F>
where
    F: Fn(&R) -> f64 + Clone,
{
    Max { best: None, metric }
}

impl<R, F> Aggregate<R> for Max<F>
where
    F: Fn(&R) -> f64 + Clone,
{
    type Output = Option<f64>;

    fn update(&mut self, row: &R) {
        let value = (self.metric)(row);
        self.best = Some(match self.best {
            Some(best) if best >= value => best,
            _ => value,
        });
    }

    fn finish(self) -> Option<f64> {
        self.best
    }
}

/// Ratio of two summed metrics with a zero-denominator guard.
///
/// `finish` yields `None` (the undefined sentinel, a reportable null) when
/// the denominator sums to zero, mirroring SQL's NULL on division by zero.
#[derive(Debug, Clone)]
pub struct Ratio<N, D> {
    numerator_total: f64,
    denominator_total: f64,
    numerator: N,
    denominator: D,
}

pub fn ratio<R, N, D>(numerator: N, denominator: D) -> Ratio<N, D>
where
    N: Fn(&R) -> f64 + Clone,
    D: Fn(&R) -> f64 + Clone,
{
    Ratio {
        numerator_total: 0.0,
        denominator_total: 0.0,
        numerator,
        denominator,
    }
}

impl<R, N, D> Aggregate<R> for Ratio<N, D>
where
    N: Fn(&R) -> f64 + Clone,
    D: Fn(&R) -> f64 + Clone,
{
    type Output = Option<f64>;

    fn update(&mut self, row: &R) {
        self.numerator_total += (self.numerator)(row);
        self.denominator_total += (self.denominator)(row);
    }

    fn finish(self) -> Option<f64> {
        if self.denominator_total == 0.0 {
            None
        } else {
            Some(self.numerator_total / self.denominator_total)
        }
    }
}

impl<R, A, B> Aggregate<R> for (A, B)
where
    A: Aggregate<R>,
    B: Aggregate<R>,
{
    type Output = (A::Output, B::Output);

    fn update(&mut self, row: &R) {
        self.0.update(row);
        self.1.update(row);
    }

    fn finish(self) -> Self::Output {
        (self.0.finish(), self.1.finish())
    }
}

impl<R, A, B, C> Aggregate<R> for (A, B, C)
where
    A: Aggregate<R>,
    B: Aggregate<R>,
    C: Aggregate<R>,
{
    type Output = (A::Output, B::Output, C::Output);

    fn update(&mut self, row: &R) {
        self.0.update(row);
        self.1.update(row);
        self.2.update(row);
    }

    fn finish(self) -> Self::Output {
        (self.0.finish(), self.1.finish(), self.2.finish())
    }
}
