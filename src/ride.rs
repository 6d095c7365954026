use crate::record::{check_non_negative, EntityType, ParseEnumError, Record, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terminal status of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RideStatus {
    Completed,
    Canceled,
}

impl FromStr for RideStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Completed" => Ok(RideStatus::Completed),
            "Canceled" => Ok(RideStatus::Canceled),
            other => Err(ParseEnumError {
                value: other.to_string(),
                expected: &["Completed", "Canceled"],
            }),
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RideStatus::Completed => write!(f, "Completed"),
            RideStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

/// A single ride fact record.
///
/// `driver_id` must reference a loaded [`crate::driver::Driver`]; `user_id`
/// is an opaque grouping key with no backing relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    pub ride_id: u64,
    pub driver_id: u64,
    pub user_id: u64,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub distance_km: f64,
    pub fare_amount: f64,
    pub status: RideStatus,
    pub ride_date_time: DateTime<Utc>,
}

impl Ride {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ride_id: u64,
        driver_id: u64,
        user_id: u64,
        pickup_location: impl Into<String>,
        dropoff_location: impl Into<String>,
        distance_km: f64,
        fare_amount: f64,
        status: RideStatus,
        ride_date_time: DateTime<Utc>,
    ) -> Self {
        Ride {
            ride_id,
            driver_id,
            user_id,
            pickup_location: pickup_location.into(),
            dropoff_location: dropoff_location.into(),
            distance_km,
            fare_amount,
            status,
            ride_date_time,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == RideStatus::Completed
    }

    pub fn is_canceled(&self) -> bool {
        self.status == RideStatus::Canceled
    }
}

impl Record for Ride {
    type Key = u64;

    const ENTITY: EntityType = EntityType::Ride;

    fn key(&self) -> u64 {
        self.ride_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative(Self::ENTITY, self.ride_id, "distance_km", self.distance_km)?;
        check_non_negative(Self::ENTITY, self.ride_id, "fare_amount", self.fare_amount)
    }
}
