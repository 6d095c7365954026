//! End-to-end checks across the store, the primitives, and the catalog.

use crate::driver::{Driver, VehicleType};
use crate::food_order::{FoodOrder, OrderStatus};
use crate::queries;
use crate::report::{Report, ReportConfig};
use crate::restaurant::Restaurant;
use crate::ride::{Ride, RideStatus};
use crate::store::RelationStore;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
}

/// A month of synthetic activity: three drivers, two restaurants, rides and
/// orders spread across users, hours, and statuses.
fn populated_store() -> RelationStore {
    let drivers = vec![
        Driver::new(1, "Asha", 4.9, VehicleType::Car),
        Driver::new(2, "Ben", 4.2, VehicleType::Bike),
        Driver::new(3, "Chloe", 3.8, VehicleType::Car),
    ];
    let restaurants = vec![
        Restaurant::new(10, "Taco Town", "Mexican", "Downtown", 4.2),
        Restaurant::new(11, "Pasta Place", "Italian", "Uptown", 4.6),
    ];

    let mut rides = Vec::new();
    for i in 0..30u64 {
        let status = if i % 5 == 4 {
            RideStatus::Canceled
        } else {
            RideStatus::Completed
        };
        rides.push(Ride::new(
            i + 1,
            (i % 3) + 1,
            100 + (i % 4),
            "A",
            "B",
            2.0 + i as f64 * 0.1,
            8.0 + i as f64,
            status,
            base_time() + Duration::hours(i as i64 * 7),
        ));
    }

    let mut orders = Vec::new();
    for i in 0..20u64 {
        let status = match i % 7 {
            5 => OrderStatus::Canceled,
            6 => OrderStatus::Refunded,
            _ => OrderStatus::Completed,
        };
        orders.push(FoodOrder::new(
            i + 1,
            100 + (i % 4),
            10 + (i % 2),
            base_time() + Duration::minutes(i as i64 * 95),
            status,
            12.0 + i as f64,
            2.5,
        ));
    }

    RelationStore::load(drivers, restaurants, rides, orders).unwrap()
}

#[test]
fn full_report_runs_over_populated_store() {
    let store = populated_store();
    let report = Report::generate(&store, &ReportConfig::default()).unwrap();

    assert_eq!(report.top_spenders.len(), 4, "one row per active user");
    assert!(!report.rides_by_hour.is_empty());
    assert_eq!(report.driver_efficiency.len(), 3);
    assert_eq!(report.restaurant_revenue.len(), 2);
    assert!(!report.monthly_revenue.is_empty());
}

#[test]
fn running_total_final_value_matches_total_revenue() {
    let store = populated_store();
    let monthly = queries::monthly_revenue_running_total(&store);

    let total: f64 = store
        .rides()
        .scan()
        .iter()
        .filter(|ride| ride.is_completed())
        .map(|ride| ride.fare_amount)
        .sum();
    let last = monthly.last().unwrap();
    assert!((last.running_total - total).abs() < 1e-9);

    let summed: f64 = monthly.iter().map(|row| row.revenue).sum();
    assert!((summed - total).abs() < 1e-9);
}

#[test]
fn top_spender_ranks_cover_every_user_once() {
    let store = populated_store();
    let ranked = queries::top_spenders(&store);
    let spend = queries::total_spend_by_user(&store);
    assert_eq!(ranked.len(), spend.len());
    assert_eq!(ranked[0].rank, 1);
    // Spend never increases as rank worsens.
    for pair in ranked.windows(2) {
        assert!(pair[0].total_spend >= pair[1].total_spend);
        assert!(pair[0].rank <= pair[1].rank);
    }
}

#[test]
fn big_spenders_are_a_prefix_of_the_ranking() {
    let store = populated_store();
    let ranked = queries::top_spenders(&store);
    let big = queries::big_spenders(&store, 0.5).unwrap();
    assert!(!big.is_empty());
    assert!(big.len() < ranked.len());

    let cutoff = big.len();
    let top_ids: Vec<u64> = ranked[..cutoff].iter().map(|row| row.user_id).collect();
    for spender in &big {
        assert!(top_ids.contains(&spender.user_id));
    }
}

#[test]
fn order_gaps_are_non_negative_and_start_undefined() {
    let store = populated_store();
    let gaps = queries::order_gaps_by_user(&store);

    let mut seen_users = std::collections::HashSet::new();
    for gap in &gaps {
        if seen_users.insert(gap.user_id) {
            assert_eq!(gap.minutes_since_previous, None, "first order per user");
        } else {
            assert!(gap.minutes_since_previous.unwrap() >= 0);
        }
    }
}

#[test]
fn rolling_fares_never_exceed_driver_total() {
    let store = populated_store();
    let rolling = queries::rolling_driver_fares(&store, 5).unwrap();
    for row in &rolling {
        let driver_total: f64 = store
            .rides()
            .scan()
            .iter()
            .filter(|ride| ride.driver_id == row.driver_id && ride.is_completed())
            .map(|ride| ride.fare_amount)
            .sum();
        assert!(row.rolling_fare <= driver_total + 1e-9);
    }
}

#[test]
fn store_survives_concurrent_readers() {
    let store = populated_store();
    let config = ReportConfig::default();
    let (left, right) = rayon::join(
        || Report::generate(&store, &config).unwrap(),
        || Report::generate(&store, &config).unwrap(),
    );
    assert_eq!(left, right);
}
