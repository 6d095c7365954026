//! Full-catalog report runner.
//!
//! Evaluates every catalog query against one loaded store. The store is
//! immutable and `Sync`, so independent sections run concurrently on the
//! rayon pool; results are still assembled in a fixed order.

use crate::error::EngineError;
use crate::queries::{
    self, CuisineOrderValue, DriverEfficiency, DriverRollingFare, HourlyRides, MonthlyRevenue,
    OrderGap, RankedUserSpend, RestaurantDayKindOrders, RestaurantRefundShare, RestaurantRevenue,
    UserSpend, VehicleCancellation,
};
use crate::store::RelationStore;
use serde::Serialize;
use tracing::debug;

/// Tunable parameters for report generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportConfig {
    /// Trailing-window size for rolling driver fares, in rides.
    pub rolling_window: usize,
    /// Spend-percentile threshold for the big-spender classification.
    pub spend_percentile: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            rolling_window: 7,
            spend_percentile: 0.8,
        }
    }
}

impl ReportConfig {
    fn validate(&self) -> Result<(), EngineError> {
        if self.rolling_window == 0 {
            return Err(EngineError::ZeroWindow);
        }
        if !(0.0..=1.0).contains(&self.spend_percentile) {
            return Err(EngineError::InvalidPercentile(self.spend_percentile));
        }
        Ok(())
    }
}

/// All catalog sections, computed from one store snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub top_spenders: Vec<RankedUserSpend>,
    pub big_spenders: Vec<UserSpend>,
    pub rides_by_hour: Vec<HourlyRides>,
    pub cancellation_rate_by_vehicle: Vec<VehicleCancellation>,
    pub driver_efficiency: Vec<DriverEfficiency>,
    pub restaurant_revenue: Vec<RestaurantRevenue>,
    pub weekend_orders: Vec<RestaurantDayKindOrders>,
    pub avg_order_value_by_cuisine: Vec<CuisineOrderValue>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub rolling_driver_fares: Vec<DriverRollingFare>,
    pub order_gaps: Vec<OrderGap>,
    pub refund_share: Vec<RestaurantRefundShare>,
}

impl Report {
    /// Runs the whole catalog. Ride-side and order-side sections execute in
    /// parallel; any section error aborts the report.
    pub fn generate(store: &RelationStore, config: &ReportConfig) -> Result<Report, EngineError> {
        config.validate()?;

        let (ride_sections, order_sections) = rayon::join(
            || -> Result<_, EngineError> {
                Ok((
                    queries::top_spenders(store),
                    queries::big_spenders(store, config.spend_percentile)?,
                    queries::rides_by_hour(store),
                    queries::cancellation_rate_by_vehicle(store)?,
                    queries::driver_efficiency(store)?,
                    queries::monthly_revenue_running_total(store),
                    queries::rolling_driver_fares(store, config.rolling_window)?,
                ))
            },
            || -> Result<_, EngineError> {
                Ok((
                    queries::restaurant_revenue_rank(store)?,
                    queries::weekend_orders_by_restaurant(store),
                    queries::avg_order_value_by_cuisine(store)?,
                    queries::order_gaps_by_user(store),
                    queries::refund_share_by_restaurant(store),
                ))
            },
        );

        let (
            top_spenders,
            big_spenders,
            rides_by_hour,
            cancellation_rate_by_vehicle,
            driver_efficiency,
            monthly_revenue,
            rolling_driver_fares,
        ) = ride_sections?;
        let (restaurant_revenue, weekend_orders, avg_order_value_by_cuisine, order_gaps, refund_share) =
            order_sections?;

        debug!(
            spenders = top_spenders.len(),
            restaurants = restaurant_revenue.len(),
            months = monthly_revenue.len(),
            "report generated"
        );

        Ok(Report {
            top_spenders,
            big_spenders,
            rides_by_hour,
            cancellation_rate_by_vehicle,
            driver_efficiency,
            restaurant_revenue,
            weekend_orders,
            avg_order_value_by_cuisine,
            monthly_revenue,
            rolling_driver_fares,
            order_gaps,
            refund_share,
        })
    }
}
