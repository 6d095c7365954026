use crate::record::{check_non_negative, EntityType, ParseEnumError, Record, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terminal status of a food order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Completed,
    Canceled,
    Refunded,
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Completed" => Ok(OrderStatus::Completed),
            "Canceled" => Ok(OrderStatus::Canceled),
            "Refunded" => Ok(OrderStatus::Refunded),
            other => Err(ParseEnumError {
                value: other.to_string(),
                expected: &["Completed", "Canceled", "Refunded"],
            }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Completed => write!(f, "Completed"),
            OrderStatus::Canceled => write!(f, "Canceled"),
            OrderStatus::Refunded => write!(f, "Refunded"),
        }
    }
}

/// A single food-delivery order fact record.
///
/// `restaurant_id` must reference a loaded [`crate::restaurant::Restaurant`];
/// `user_id` is the same opaque grouping key used by rides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodOrder {
    pub order_id: u64,
    pub user_id: u64,
    pub restaurant_id: u64,
    pub order_date_time: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_price: f64,
    pub delivery_fee: f64,
}

impl FoodOrder {
    pub fn new(
        order_id: u64,
        user_id: u64,
        restaurant_id: u64,
        order_date_time: DateTime<Utc>,
        status: OrderStatus,
        total_price: f64,
        delivery_fee: f64,
    ) -> Self {
        FoodOrder {
            order_id,
            user_id,
            restaurant_id,
            order_date_time,
            status,
            total_price,
            delivery_fee,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Gross revenue for the order (item total plus delivery fee).
    pub fn gross_value(&self) -> f64 {
        self.total_price + self.delivery_fee
    }
}

impl Record for FoodOrder {
    type Key = u64;

    const ENTITY: EntityType = EntityType::FoodOrder;

    fn key(&self) -> u64 {
        self.order_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative(Self::ENTITY, self.order_id, "total_price", self.total_price)?;
        check_non_negative(Self::ENTITY, self.order_id, "delivery_fee", self.delivery_fee)
    }
}
