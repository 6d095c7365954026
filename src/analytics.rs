//! Analytical primitives.
//!
//! The generic operations every catalog query reduces to: single-pass
//! filter/group/aggregate, ordered-partition windows (ranking, running and
//! trailing sums, lag differences), continuous percentiles, and
//! time-bucketing helpers. All primitives are pure functions over immutable
//! row slices and produce deterministically ordered output.

pub mod aggregate;
pub mod percentile;
pub mod time_bucket;
pub mod window;

pub use aggregate::{
    count, count_if, group_aggregate, max_of, mean, min_of, ratio, sum, Aggregate, GroupRow,
};
pub use percentile::{above_percentile, percentile_cont};
pub use time_bucket::{calendar_date, day_of_week, hour_of_day, is_weekend, DayKind, YearMonth};
pub use window::{lag_delta, rank, running_sum, trailing_sum, RankMethod, WindowRow};
