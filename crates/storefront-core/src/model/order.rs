use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::StorefrontError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Statuses that should not linger: the order is not yet with the carrier.
    pub fn is_open(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(StorefrontError::BadRequest(format!("unknown order status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: u64,
    pub order_id: u64,
    pub product_id: u64,
    pub quantity: u32,
    /// Unit price in cents at the time of the order.
    pub price: u64,
}

impl OrderItem {
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer_id: u64,
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
    /// Always the sum of the item line totals.
    pub total_amount: u64,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn calculate_total(&mut self) {
        self.total_amount = self
            .items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.line_total()));
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub product_id: u64,
    pub quantity: u32,
}

/// Insert payload. Item prices are copied from the products by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_id: u64,
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
    pub items: Vec<NewOrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: u64, quantity: u32) -> OrderItem {
        OrderItem { id: 0, order_id: 1, product_id: 1, quantity, price }
    }

    #[test]
    fn total_is_sum_of_lines() {
        let mut order = Order {
            id: 1,
            customer_id: 1,
            order_date: NaiveDateTime::default(),
            status: OrderStatus::Pending,
            total_amount: 0,
            items: vec![item(250, 2), item(1_000, 3)],
        };
        order.calculate_total();
        assert_eq!(order.total_amount, 3_500);

        order.items.clear();
        order.calculate_total();
        assert_eq!(order.total_amount, 0);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("pending".parse::<OrderStatus>().ok(), Some(OrderStatus::Pending));
        assert_eq!("SHIPPED".parse::<OrderStatus>().ok(), Some(OrderStatus::Shipped));
        assert!("LOST".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn open_statuses() {
        assert!(OrderStatus::Pending.is_open());
        assert!(OrderStatus::Processing.is_open());
        assert!(!OrderStatus::Delivered.is_open());
        assert!(!OrderStatus::Cancelled.is_open());
    }
}
