//! In-memory relation store.
//!
//! The four relations are bulk-loaded once, validated eagerly, and then
//! served read-only for the lifetime of the store. Load order is preserved
//! and acts as the deterministic secondary sort key for every
//! ordering-dependent primitive.

use crate::driver::Driver;
use crate::food_order::FoodOrder;
use crate::record::{EntityType, Record, ValidationError};
use crate::restaurant::Restaurant;
use crate::ride::Ride;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Errors raised while loading relations or resolving joins.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A record failed its domain checks.
    Validation(ValidationError),
    /// Two records in one relation share a primary key.
    DuplicateKey { entity: EntityType, key: String },
    /// Lookup of a key that is not present in the relation.
    NotFound { entity: EntityType, key: String },
    /// A fact record references a dimension key that was never loaded.
    ForeignKey {
        entity: EntityType,
        key: String,
        references: EntityType,
        missing: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(err) => write!(f, "{}", err),
            StoreError::DuplicateKey { entity, key } => {
                write!(f, "duplicate {} key {}", entity, key)
            }
            StoreError::NotFound { entity, key } => {
                write!(f, "{} {} not found", entity, key)
            }
            StoreError::ForeignKey {
                entity,
                key,
                references,
                missing,
            } => write!(
                f,
                "{} {} references unknown {} {}",
                entity, key, references, missing
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err)
    }
}

/// One relation: rows in load order plus a primary-key index.
#[derive(Debug, Clone)]
pub struct Relation<R: Record> {
    rows: Vec<R>,
    index: HashMap<R::Key, usize>,
}

impl<R: Record> Relation<R> {
    /// Validates and indexes a batch of records.
    ///
    /// Fail-fast: the first invalid record or duplicate key aborts the load
    /// with its context; no partially-valid relation is ever produced.
    pub fn load(records: Vec<R>) -> Result<Self, StoreError> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            record.validate()?;
            if index.insert(record.key(), position).is_some() {
                return Err(StoreError::DuplicateKey {
                    entity: R::ENTITY,
                    key: record.key().to_string(),
                });
            }
        }
        debug!(entity = %R::ENTITY, rows = records.len(), "relation loaded");
        Ok(Relation {
            rows: records,
            index,
        })
    }

    /// All rows in load order.
    pub fn scan(&self) -> &[R] {
        &self.rows
    }

    /// Primary-key lookup.
    pub fn get(&self, key: &R::Key) -> Result<&R, StoreError> {
        self.index
            .get(key)
            .map(|&position| &self.rows[position])
            .ok_or_else(|| StoreError::NotFound {
                entity: R::ENTITY,
                key: format!("{}", key),
            })
    }

    pub fn contains(&self, key: &R::Key) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The four relations behind one immutable value.
///
/// Constructed once via [`RelationStore::load`]; afterwards the store is
/// plain owned data (`Send + Sync`), so independent queries may read it
/// concurrently without locking.
#[derive(Debug, Clone)]
pub struct RelationStore {
    drivers: Relation<Driver>,
    restaurants: Relation<Restaurant>,
    rides: Relation<Ride>,
    orders: Relation<FoodOrder>,
}

impl RelationStore {
    /// Loads all four relations and enforces referential integrity.
    ///
    /// Every ride must reference a loaded driver and every order a loaded
    /// restaurant; a dangling foreign key fails the load here rather than
    /// surfacing mid-aggregation. `user_id` is an opaque key and is not
    /// checked against any relation.
    pub fn load(
        drivers: Vec<Driver>,
        restaurants: Vec<Restaurant>,
        rides: Vec<Ride>,
        orders: Vec<FoodOrder>,
    ) -> Result<Self, StoreError> {
        let drivers = Relation::load(drivers)?;
        let restaurants = Relation::load(restaurants)?;
        let rides = Relation::load(rides)?;
        let orders = Relation::load(orders)?;

        for ride in rides.scan() {
            if !drivers.contains(&ride.driver_id) {
                return Err(StoreError::ForeignKey {
                    entity: EntityType::Ride,
                    key: ride.ride_id.to_string(),
                    references: EntityType::Driver,
                    missing: ride.driver_id.to_string(),
                });
            }
        }
        for order in orders.scan() {
            if !restaurants.contains(&order.restaurant_id) {
                return Err(StoreError::ForeignKey {
                    entity: EntityType::FoodOrder,
                    key: order.order_id.to_string(),
                    references: EntityType::Restaurant,
                    missing: order.restaurant_id.to_string(),
                });
            }
        }

        debug!(
            drivers = drivers.len(),
            restaurants = restaurants.len(),
            rides = rides.len(),
            orders = orders.len(),
            "relation store loaded, referential integrity verified"
        );

        Ok(RelationStore {
            drivers,
            restaurants,
            rides,
            orders,
        })
    }

    pub fn drivers(&self) -> &Relation<Driver> {
        &self.drivers
    }

    pub fn restaurants(&self) -> &Relation<Restaurant> {
        &self.restaurants
    }

    pub fn rides(&self) -> &Relation<Ride> {
        &self.rides
    }

    pub fn orders(&self) -> &Relation<FoodOrder> {
        &self.orders
    }

    /// Join lookup: the driver a ride references.
    pub fn driver(&self, driver_id: u64) -> Result<&Driver, StoreError> {
        self.drivers.get(&driver_id)
    }

    /// Join lookup: the restaurant an order references.
    pub fn restaurant(&self, restaurant_id: u64) -> Result<&Restaurant, StoreError> {
        self.restaurants.get(&restaurant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::VehicleType;
    use crate::food_order::OrderStatus;
    use crate::ride::RideStatus;
    use chrono::{TimeZone, Utc};

    fn sample_driver(id: u64) -> Driver {
        Driver::new(id, format!("Driver {}", id), 4.5, VehicleType::Car)
    }

    fn sample_restaurant(id: u64) -> Restaurant {
        Restaurant::new(id, format!("Restaurant {}", id), "Italian", "Center", 4.0)
    }

    fn sample_ride(id: u64, driver_id: u64) -> Ride {
        Ride::new(
            id,
            driver_id,
            100,
            "A",
            "B",
            2.0,
            10.0,
            RideStatus::Completed,
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        )
    }

    fn sample_order(id: u64, restaurant_id: u64) -> FoodOrder {
        FoodOrder::new(
            id,
            100,
            restaurant_id,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            OrderStatus::Completed,
            20.0,
            3.0,
        )
    }

    #[test]
    fn relation_load_preserves_order_and_indexes_keys() {
        let relation = Relation::load(vec![sample_driver(3), sample_driver(1)]).unwrap();
        assert_eq!(relation.len(), 2);
        assert_eq!(relation.scan()[0].driver_id, 3);
        assert_eq!(relation.get(&1).unwrap().driver_id, 1);
    }

    #[test]
    fn relation_load_rejects_duplicate_keys() {
        let err = Relation::load(vec![sample_driver(1), sample_driver(1)]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[test]
    fn relation_load_fails_fast_on_invalid_record() {
        let bad = Driver::new(2, "Bad", 9.0, VehicleType::Bike);
        let err = Relation::load(vec![sample_driver(1), bad]).unwrap_err();
        match err {
            StoreError::Validation(validation) => assert_eq!(validation.field, "rating"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn relation_get_unknown_key_is_not_found() {
        let relation = Relation::load(vec![sample_driver(1)]).unwrap();
        let err = relation.get(&99).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn store_load_verifies_ride_driver_reference() {
        let err = RelationStore::load(
            vec![sample_driver(1)],
            vec![sample_restaurant(10)],
            vec![sample_ride(1, 99)],
            vec![],
        )
        .unwrap_err();
        match err {
            StoreError::ForeignKey {
                entity, missing, ..
            } => {
                assert_eq!(entity, EntityType::Ride);
                assert_eq!(missing, "99");
            }
            other => panic!("expected foreign key error, got {:?}", other),
        }
    }

    #[test]
    fn store_load_verifies_order_restaurant_reference() {
        let err = RelationStore::load(
            vec![sample_driver(1)],
            vec![sample_restaurant(10)],
            vec![],
            vec![sample_order(1, 55)],
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { .. }));
    }

    #[test]
    fn store_join_lookups_resolve_loaded_keys() {
        let store = RelationStore::load(
            vec![sample_driver(1)],
            vec![sample_restaurant(10)],
            vec![sample_ride(1, 1)],
            vec![sample_order(1, 10)],
        )
        .unwrap();
        assert_eq!(store.driver(1).unwrap().driver_id, 1);
        assert_eq!(store.restaurant(10).unwrap().restaurant_id, 10);
        assert!(store.driver(2).is_err());
    }

    #[test]
    fn empty_fact_relations_are_legal() {
        let store = RelationStore::load(
            vec![sample_driver(1)],
            vec![sample_restaurant(10)],
            vec![],
            vec![],
        )
        .unwrap();
        assert!(store.rides().is_empty());
        assert!(store.orders().is_empty());
    }
}
