use crate::record::{check_rating, EntityType, ParseEnumError, Record, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle class a driver operates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Car,
    Bike,
}

impl FromStr for VehicleType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Car" => Ok(VehicleType::Car),
            "Bike" => Ok(VehicleType::Bike),
            other => Err(ParseEnumError {
                value: other.to_string(),
                expected: &["Car", "Bike"],
            }),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleType::Car => write!(f, "Car"),
            VehicleType::Bike => write!(f, "Bike"),
        }
    }
}

/// Driver dimension record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: u64,
    pub name: String,
    /// Driver rating, constrained to [1, 5] at load time.
    pub rating: f64,
    pub vehicle_type: VehicleType,
}

impl Driver {
    pub fn new(
        driver_id: u64,
        name: impl Into<String>,
        rating: f64,
        vehicle_type: VehicleType,
    ) -> Self {
        Driver {
            driver_id,
            name: name.into(),
            rating,
            vehicle_type,
        }
    }
}

impl Record for Driver {
    type Key = u64;

    const ENTITY: EntityType = EntityType::Driver;

    fn key(&self) -> u64 {
        self.driver_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::new(
                Self::ENTITY,
                self.driver_id,
                "name",
                "must not be empty",
            ));
        }
        check_rating(Self::ENTITY, self.driver_id, "rating", self.rating, 1.0, 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_driver_passes_validation() {
        let driver = Driver::new(1, "Asha", 4.7, VehicleType::Car);
        assert!(driver.validate().is_ok());
        assert_eq!(driver.key(), 1);
    }

    #[test]
    fn rating_outside_one_to_five_is_rejected() {
        let driver = Driver::new(2, "Ben", 0.5, VehicleType::Bike);
        let err = driver.validate().unwrap_err();
        assert_eq!(err.field, "rating");
        assert_eq!(err.entity, EntityType::Driver);
    }

    #[test]
    fn empty_name_is_rejected() {
        let driver = Driver::new(3, "", 3.0, VehicleType::Car);
        assert_eq!(driver.validate().unwrap_err().field, "name");
    }

    #[test]
    fn vehicle_type_parses_known_values_only() {
        assert_eq!("Car".parse::<VehicleType>().unwrap(), VehicleType::Car);
        assert_eq!("Bike".parse::<VehicleType>().unwrap(), VehicleType::Bike);
        let err = "Scooter".parse::<VehicleType>().unwrap_err();
        assert_eq!(err.value, "Scooter");
    }
}
