pub mod analytics;
pub mod driver;
pub mod error;
pub mod food_order;
pub mod queries;
pub mod record;
pub mod report;
pub mod restaurant;
pub mod ride;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use analytics::{
    above_percentile, calendar_date, count, count_if, day_of_week, group_aggregate, hour_of_day,
    is_weekend, lag_delta, max_of, mean, min_of, percentile_cont, rank, ratio, running_sum, sum,
    trailing_sum, Aggregate, DayKind, GroupRow, RankMethod, WindowRow, YearMonth,
};
pub use driver::{Driver, VehicleType};
pub use error::EngineError;
pub use food_order::{FoodOrder, OrderStatus};
pub use record::{EntityType, ParseEnumError, Record, ValidationError};
pub use report::{Report, ReportConfig};
pub use restaurant::Restaurant;
pub use ride::{Ride, RideStatus};
pub use store::{Relation, RelationStore, StoreError};
