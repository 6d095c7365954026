use std::fmt;
use std::hash::Hash;

/// Tag identifying which relation a record belongs to.
///
/// Used in error reporting so a failed load or lookup names the offending
/// relation instead of a bare key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Ride,
    FoodOrder,
    Driver,
    Restaurant,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Ride => write!(f, "ride"),
            EntityType::FoodOrder => write!(f, "food_order"),
            EntityType::Driver => write!(f, "driver"),
            EntityType::Restaurant => write!(f, "restaurant"),
        }
    }
}

/// A record that failed its load-time domain checks.
///
/// Carries enough context (entity, key, field) for the caller to report the
/// exact offending record; the engine never aggregates over invalid data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub entity: EntityType,
    pub key: String,
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(
        entity: EntityType,
        key: impl fmt::Display,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        ValidationError {
            entity,
            key: key.to_string(),
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} record {} (field `{}`): {}",
            self.entity, self.key, self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// An enum-valued field received a string outside its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub value: String,
    pub expected: &'static [&'static str],
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown value `{}`, expected one of: {}",
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for ParseEnumError {}

/// Common behavior for the four relation record types.
///
/// A record exposes its primary key and a fail-fast `validate` that checks
/// every domain invariant (non-negative amounts, rating bounds, non-empty
/// names) before the record is admitted into a relation.
pub trait Record {
    type Key: Eq + Hash + Clone + fmt::Debug + fmt::Display;

    /// Relation tag, used when reporting validation and lookup failures.
    const ENTITY: EntityType;

    fn key(&self) -> Self::Key;

    fn validate(&self) -> Result<(), ValidationError>;
}

/// Checks that a numeric field is finite and non-negative.
pub(crate) fn check_non_negative<K: fmt::Display>(
    entity: EntityType,
    key: K,
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(
            entity,
            key,
            field,
            format!("must be finite, got {}", value),
        ));
    }
    if value < 0.0 {
        return Err(ValidationError::new(
            entity,
            key,
            field,
            format!("must be non-negative, got {}", value),
        ));
    }
    Ok(())
}

/// Checks that a rating lies within `[min, max]`.
pub(crate) fn check_rating<K: fmt::Display>(
    entity: EntityType,
    key: K,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::new(
            entity,
            key,
            field,
            format!("must be within [{}, {}], got {}", min, max, value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_display_names() {
        assert_eq!(EntityType::Ride.to_string(), "ride");
        assert_eq!(EntityType::FoodOrder.to_string(), "food_order");
    }

    #[test]
    fn validation_error_names_entity_key_and_field() {
        let err = ValidationError::new(EntityType::Driver, 7, "rating", "out of range");
        let text = err.to_string();
        assert!(text.contains("driver"));
        assert!(text.contains("7"));
        assert!(text.contains("rating"));
    }

    #[test]
    fn non_negative_check_rejects_nan_and_negative() {
        assert!(check_non_negative(EntityType::Ride, 1, "fare_amount", f64::NAN).is_err());
        assert!(check_non_negative(EntityType::Ride, 1, "fare_amount", -0.01).is_err());
        assert!(check_non_negative(EntityType::Ride, 1, "fare_amount", 0.0).is_ok());
    }

    #[test]
    fn rating_check_enforces_bounds() {
        assert!(check_rating(EntityType::Driver, 1, "rating", 0.9, 1.0, 5.0).is_err());
        assert!(check_rating(EntityType::Driver, 1, "rating", 5.1, 1.0, 5.0).is_err());
        assert!(check_rating(EntityType::Driver, 1, "rating", 1.0, 1.0, 5.0).is_ok());
        assert!(check_rating(EntityType::Driver, 1, "rating", 5.0, 1.0, 5.0).is_ok());
    }
}
