use crate::record::{check_rating, EntityType, Record, ValidationError};
use serde::{Deserialize, Serialize};

/// Restaurant dimension record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub restaurant_id: u64,
    pub name: String,
    pub cuisine_type: String,
    pub location: String,
    /// Restaurant rating, constrained to [0, 5] at load time.
    pub rating: f64,
}

impl Restaurant {
    pub fn new(
        restaurant_id: u64,
        name: impl Into<String>,
        cuisine_type: impl Into<String>,
        location: impl Into<String>,
        rating: f64,
    ) -> Self {
        Restaurant {
            restaurant_id,
            name: name.into(),
            cuisine_type: cuisine_type.into(),
            location: location.into(),
            rating,
        }
    }
}

impl Record for Restaurant {
    type Key = u64;

    const ENTITY: EntityType = EntityType::Restaurant;

    fn key(&self) -> u64 {
        self.restaurant_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::new(
                Self::ENTITY,
                self.restaurant_id,
                "name",
                "must not be empty",
            ));
        }
        check_rating(
            Self::ENTITY,
            self.restaurant_id,
            "rating",
            self.rating,
            0.0,
            5.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_restaurant_passes_validation() {
        let restaurant = Restaurant::new(10, "Taco Town", "Mexican", "Downtown", 4.2);
        assert!(restaurant.validate().is_ok());
        assert_eq!(restaurant.key(), 10);
    }

    #[test]
    fn rating_above_five_is_rejected() {
        let restaurant = Restaurant::new(11, "Over Five", "Fusion", "Uptown", 5.3);
        assert_eq!(restaurant.validate().unwrap_err().field, "rating");
    }

    #[test]
    fn zero_rating_is_allowed() {
        let restaurant = Restaurant::new(12, "New Spot", "Thai", "Midtown", 0.0);
        assert!(restaurant.validate().is_ok());
    }
}
