//! Domain query catalog.
//!
//! Each function is an independent, read-only query over the loaded
//! [`RelationStore`], expressed in terms of the generic primitives in
//! [`crate::analytics`]. Result rows are plain serializable structs so an
//! external reporting layer can consume them directly.
//!
//! Undefined metrics (zero-denominator ratios, missing predecessors) are
//! `None`, never NaN or a fault.

use crate::analytics::{
    above_percentile, count, count_if, group_aggregate, hour_of_day, lag_delta, mean, rank,
    running_sum, sum, trailing_sum, DayKind, RankMethod, YearMonth,
};
use crate::driver::VehicleType;
use crate::error::EngineError;
use crate::food_order::{FoodOrder, OrderStatus};
use crate::ride::{Ride, RideStatus};
use crate::store::RelationStore;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSpend {
    pub user_id: u64,
    pub total_spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedUserSpend {
    pub user_id: u64,
    pub total_spend: f64,
    pub rank: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRides {
    pub hour: u32,
    pub rides: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleCancellation {
    pub vehicle_type: VehicleType,
    pub total: u64,
    pub canceled: u64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverEfficiency {
    pub driver_id: u64,
    pub name: String,
    pub completed: u64,
    pub canceled: u64,
    /// Completed-to-canceled ratio; `None` when the driver has no
    /// canceled rides.
    pub efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantRevenue {
    pub restaurant_id: u64,
    pub name: String,
    pub revenue: f64,
    pub rank: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantDayKindOrders {
    pub restaurant_id: u64,
    pub day_kind: DayKind,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisineOrderValue {
    pub cuisine_type: String,
    pub avg_order_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: YearMonth,
    pub revenue: f64,
    pub running_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverRollingFare {
    pub driver_id: u64,
    pub ride_id: u64,
    pub rolling_fare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderGap {
    pub user_id: u64,
    pub order_id: u64,
    /// Minutes since the user's previous completed order; `None` for the
    /// first order in the partition.
    pub minutes_since_previous: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantRefundShare {
    pub restaurant_id: u64,
    pub refunded: u64,
    pub completed: u64,
    /// Refunded-to-completed ratio; `None` when the restaurant has no
    /// completed orders.
    pub share: Option<f64>,
}

/// Completed-ride fare total per user, ascending by user id.
pub fn total_spend_by_user(store: &RelationStore) -> Vec<UserSpend> {
    group_aggregate(
        store.rides().scan(),
        Ride::is_completed,
        |ride| ride.user_id,
        sum(|ride: &Ride| ride.fare_amount),
    )
    .into_iter()
    .map(|group| UserSpend {
        user_id: group.key,
        total_spend: group.value,
    })
    .collect()
}

/// Users competition-ranked by completed-ride spend, highest first.
pub fn top_spenders(store: &RelationStore) -> Vec<RankedUserSpend> {
    let spend = total_spend_by_user(store);
    rank(&spend, |_| (), |row| row.total_spend, RankMethod::Competition)
        .into_iter()
        .map(|window| {
            let row = &spend[window.row];
            RankedUserSpend {
                user_id: row.user_id,
                total_spend: row.total_spend,
                rank: window.value,
            }
        })
        .collect()
}

/// Users whose spend is strictly above the `percentile` threshold
/// (`0.8` selects the top 20%), ascending by user id.
pub fn big_spenders(
    store: &RelationStore,
    percentile: f64,
) -> Result<Vec<UserSpend>, EngineError> {
    let mut spend = total_spend_by_user(store);
    let pairs: Vec<(u64, f64)> = spend
        .iter()
        .map(|row| (row.user_id, row.total_spend))
        .collect();
    let winners: HashSet<u64> = above_percentile(&pairs, percentile)?.into_iter().collect();
    spend.retain(|row| winners.contains(&row.user_id));
    Ok(spend)
}

/// Completed rides per hour of day, ascending by hour. Hours with no rides
/// are absent.
pub fn rides_by_hour(store: &RelationStore) -> Vec<HourlyRides> {
    group_aggregate(
        store.rides().scan(),
        Ride::is_completed,
        |ride| hour_of_day(ride.ride_date_time),
        count(),
    )
    .into_iter()
    .map(|group| HourlyRides {
        hour: group.key,
        rides: group.value,
    })
    .collect()
}

/// Canceled share of all rides per vehicle type (join through the driver).
pub fn cancellation_rate_by_vehicle(
    store: &RelationStore,
) -> Result<Vec<VehicleCancellation>, EngineError> {
    let mut joined = Vec::with_capacity(store.rides().len());
    for ride in store.rides().scan() {
        let vehicle_type = store.driver(ride.driver_id)?.vehicle_type;
        joined.push((vehicle_type, ride.status));
    }

    let rows = group_aggregate(
        &joined,
        |_| true,
        |&(vehicle_type, _)| vehicle_type,
        (
            count(),
            count_if(|&(_, status): &(VehicleType, RideStatus)| status == RideStatus::Canceled),
        ),
    );

    Ok(rows
        .into_iter()
        .map(|group| {
            let (total, canceled) = group.value;
            VehicleCancellation {
                vehicle_type: group.key,
                total,
                canceled,
                rate: canceled as f64 / total as f64,
            }
        })
        .collect())
}

/// Completed/canceled ratio per driver; undefined for drivers with zero
/// canceled rides. Ascending by driver id; drivers with no rides are absent.
pub fn driver_efficiency(store: &RelationStore) -> Result<Vec<DriverEfficiency>, EngineError> {
    let rows = group_aggregate(
        store.rides().scan(),
        |_| true,
        |ride| ride.driver_id,
        (
            count_if(Ride::is_completed),
            count_if(Ride::is_canceled),
        ),
    );

    let mut output = Vec::with_capacity(rows.len());
    for group in rows {
        let (completed, canceled) = group.value;
        let efficiency = if canceled == 0 {
            None
        } else {
            Some(completed as f64 / canceled as f64)
        };
        output.push(DriverEfficiency {
            driver_id: group.key,
            name: store.driver(group.key)?.name.clone(),
            completed,
            canceled,
            efficiency,
        });
    }
    Ok(output)
}

/// Restaurants competition-ranked by completed-order gross revenue
/// (item total plus delivery fee), highest first.
pub fn restaurant_revenue_rank(
    store: &RelationStore,
) -> Result<Vec<RestaurantRevenue>, EngineError> {
    let revenue = group_aggregate(
        store.orders().scan(),
        FoodOrder::is_completed,
        |order| order.restaurant_id,
        sum(|order: &FoodOrder| order.gross_value()),
    );

    let mut output = Vec::with_capacity(revenue.len());
    for window in rank(&revenue, |_| (), |group| group.value, RankMethod::Competition) {
        let group = &revenue[window.row];
        output.push(RestaurantRevenue {
            restaurant_id: group.key,
            name: store.restaurant(group.key)?.name.clone(),
            revenue: group.value,
            rank: window.value,
        });
    }
    Ok(output)
}

/// Completed orders per (restaurant, weekend/weekday) bucket.
pub fn weekend_orders_by_restaurant(store: &RelationStore) -> Vec<RestaurantDayKindOrders> {
    group_aggregate(
        store.orders().scan(),
        FoodOrder::is_completed,
        |order| (order.restaurant_id, DayKind::of(order.order_date_time)),
        count(),
    )
    .into_iter()
    .map(|group| RestaurantDayKindOrders {
        restaurant_id: group.key.0,
        day_kind: group.key.1,
        orders: group.value,
    })
    .collect()
}

/// Mean completed-order item total per cuisine (join through the
/// restaurant), ascending by cuisine name.
pub fn avg_order_value_by_cuisine(
    store: &RelationStore,
) -> Result<Vec<CuisineOrderValue>, EngineError> {
    let mut joined = Vec::new();
    for order in store.orders().scan() {
        if !order.is_completed() {
            continue;
        }
        let cuisine = store.restaurant(order.restaurant_id)?.cuisine_type.clone();
        joined.push((cuisine, order.total_price));
    }

    Ok(group_aggregate(
        &joined,
        |_| true,
        |(cuisine, _)| cuisine.clone(),
        mean(|&(_, total): &(String, f64)| total),
    )
    .into_iter()
    .map(|group| CuisineOrderValue {
        cuisine_type: group.key,
        avg_order_value: group.value,
    })
    .collect())
}

/// Completed-ride fare revenue per year-month with a cumulative total,
/// chronological order.
pub fn monthly_revenue_running_total(store: &RelationStore) -> Vec<MonthlyRevenue> {
    let monthly = group_aggregate(
        store.rides().scan(),
        Ride::is_completed,
        |ride| YearMonth::of(ride.ride_date_time),
        sum(|ride: &Ride| ride.fare_amount),
    );

    running_sum(&monthly, |_| (), |group| group.key, |group| group.value)
        .into_iter()
        .map(|window| {
            let group = &monthly[window.row];
            MonthlyRevenue {
                month: group.key,
                revenue: group.value,
                running_total: window.value,
            }
        })
        .collect()
}

/// Trailing-`window` fare sum per driver over completed rides in time
/// order: each ride's value covers itself and up to `window - 1` rides
/// before it.
pub fn rolling_driver_fares(
    store: &RelationStore,
    window: usize,
) -> Result<Vec<DriverRollingFare>, EngineError> {
    let completed: Vec<&Ride> = store
        .rides()
        .scan()
        .iter()
        .filter(|ride| ride.is_completed())
        .collect();

    Ok(trailing_sum(
        &completed,
        |ride: &&Ride| ride.driver_id,
        |ride: &&Ride| ride.ride_date_time,
        |ride: &&Ride| ride.fare_amount,
        window,
    )?
    .into_iter()
    .map(|row| DriverRollingFare {
        driver_id: row.partition,
        ride_id: completed[row.row].ride_id,
        rolling_fare: row.value,
    })
    .collect())
}

/// Minutes between each user's consecutive completed orders; the first
/// order per user has no predecessor and yields `None`.
pub fn order_gaps_by_user(store: &RelationStore) -> Vec<OrderGap> {
    let completed: Vec<&FoodOrder> = store
        .orders()
        .scan()
        .iter()
        .filter(|order| order.is_completed())
        .collect();

    lag_delta(
        &completed,
        |order: &&FoodOrder| order.user_id,
        |order: &&FoodOrder| order.order_date_time,
    )
    .into_iter()
    .map(|row| OrderGap {
        user_id: row.partition,
        order_id: completed[row.row].order_id,
        minutes_since_previous: row.value.map(|delta| delta.num_minutes()),
    })
    .collect()
}

/// Refunded/completed order ratio per restaurant; undefined when the
/// restaurant has no completed orders.
pub fn refund_share_by_restaurant(store: &RelationStore) -> Vec<RestaurantRefundShare> {
    group_aggregate(
        store.orders().scan(),
        |_| true,
        |order| order.restaurant_id,
        (
            count_if(|order: &FoodOrder| order.status == OrderStatus::Refunded),
            count_if(FoodOrder::is_completed),
        ),
    )
    .into_iter()
    .map(|group| {
        let (refunded, completed) = group.value;
        let share = if completed == 0 {
            None
        } else {
            Some(refunded as f64 / completed as f64)
        };
        RestaurantRefundShare {
            restaurant_id: group.key,
            refunded,
            completed,
            share,
        }
    })
    .collect()
}
