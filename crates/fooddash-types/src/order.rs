//! Order types for the food delivery lifecycle.
//!
//! This module defines the order aggregate, its status enumeration, line items
//! and the append-only audit trail of status changes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Role;

/// Status of an order in its delivery lifecycle.
///
/// `Delivered` and `Cancelled` are terminal. Which statuses may follow which
/// is decided by the transition table in `fooddash-core`, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Order has been submitted by the customer.
	Placed,
	/// Restaurant has accepted the order.
	Confirmed,
	/// Kitchen is preparing the order.
	Preparing,
	/// Order is waiting for a driver.
	ReadyForPickup,
	/// A driver has collected the order.
	PickedUp,
	/// Driver is en route to the delivery address.
	OutForDelivery,
	/// Order reached the customer.
	Delivered,
	/// Order was cancelled before preparation started.
	Cancelled,
}

impl OrderStatus {
	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Placed => "PLACED",
			OrderStatus::Confirmed => "CONFIRMED",
			OrderStatus::Preparing => "PREPARING",
			OrderStatus::ReadyForPickup => "READY_FOR_PICKUP",
			OrderStatus::PickedUp => "PICKED_UP",
			OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
			OrderStatus::Delivered => "DELIVERED",
			OrderStatus::Cancelled => "CANCELLED",
		}
	}

	/// Returns an iterator over all statuses in lifecycle order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Placed,
			Self::Confirmed,
			Self::Preparing,
			Self::ReadyForPickup,
			Self::PickedUp,
			Self::OutForDelivery,
			Self::Delivered,
			Self::Cancelled,
		]
		.into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a string does not name a known order status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
	type Err = ParseOrderStatusError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::all()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| ParseOrderStatusError(s.to_string()))
	}
}

/// A single line of an order, priced at the time the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
	/// Menu item this line was ordered from.
	pub menu_item_id: String,
	/// Name of the dish when the order was placed.
	pub name: String,
	/// Number of units ordered.
	pub quantity: u32,
	/// Unit price when the order was placed.
	#[serde(with = "rust_decimal::serde::float")]
	pub price: Decimal,
}

impl OrderItem {
	/// Price of this line (unit price times quantity), `None` on overflow.
	pub fn line_total(&self) -> Option<Decimal> {
		self.price.checked_mul(Decimal::from(self.quantity))
	}
}

/// One entry of an order's audit trail.
///
/// The creation entry has no `from_status`; every later entry links to the
/// `to_status` of the entry before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
	/// Status before the change, absent for the creation event.
	#[serde(default)]
	pub from_status: Option<OrderStatus>,
	/// Status after the change.
	pub to_status: OrderStatus,
	/// Id of the user who made the change.
	pub changed_by: String,
	/// Role the user acted under.
	pub role: Role,
	/// When the change was applied.
	pub timestamp: DateTime<Utc>,
}

/// A food delivery order.
///
/// The order owns its status history. `status` always equals the `to_status`
/// of the last history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order.
	pub id: String,
	/// Customer who placed the order.
	pub customer_id: String,
	/// Restaurant fulfilling the order.
	pub restaurant_id: String,
	/// Driver bound at pickup.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub driver_id: Option<String>,
	/// Ordered line items.
	pub items: Vec<OrderItem>,
	/// Sum of all line totals.
	#[serde(with = "rust_decimal::serde::float")]
	pub total_amount: Decimal,
	/// Current status of the order.
	pub status: OrderStatus,
	/// Every status change, oldest first.
	pub status_history: Vec<StatusChange>,
	/// Where the order is delivered.
	pub delivery_address: String,
	/// Timestamp when this order was created.
	pub created_at: DateTime<Utc>,
	/// Timestamp when this order was last updated.
	pub updated_at: DateTime<Utc>,
}

impl Order {
	/// Creates a freshly placed order with its one-entry history.
	///
	/// Returns `None` when the total does not fit in a `Decimal`.
	pub fn place(
		id: String,
		customer_id: String,
		restaurant_id: String,
		items: Vec<OrderItem>,
		delivery_address: String,
		now: DateTime<Utc>,
	) -> Option<Self> {
		let total_amount = items.iter().try_fold(Decimal::ZERO, |total, item| {
			total.checked_add(item.line_total()?)
		})?;
		let creation = StatusChange {
			from_status: None,
			to_status: OrderStatus::Placed,
			changed_by: customer_id.clone(),
			role: Role::Customer,
			timestamp: now,
		};

		Some(Self {
			id,
			customer_id,
			restaurant_id,
			driver_id: None,
			items,
			total_amount,
			status: OrderStatus::Placed,
			status_history: vec![creation],
			delivery_address,
			created_at: now,
			updated_at: now,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(price: Decimal, quantity: u32) -> OrderItem {
		OrderItem {
			menu_item_id: "m1".to_string(),
			name: "Pad Thai".to_string(),
			quantity,
			price,
		}
	}

	#[test]
	fn test_status_wire_names() {
		let json = serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap();
		assert_eq!(json, "\"READY_FOR_PICKUP\"");

		for status in OrderStatus::all() {
			let json = serde_json::to_string(&status).unwrap();
			assert_eq!(json, format!("\"{}\"", status));
			assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
		}
	}

	#[test]
	fn test_unknown_status_rejected() {
		assert!("SHIPPED".parse::<OrderStatus>().is_err());
		assert!(serde_json::from_str::<OrderStatus>("\"placed\"").is_err());
	}

	#[test]
	fn test_place_computes_total_and_history() {
		let now = Utc::now();
		let order = Order::place(
			"o1".to_string(),
			"c1".to_string(),
			"r1".to_string(),
			vec![item(Decimal::new(1250, 2), 2), item(Decimal::new(399, 2), 1)],
			"1 Main St".to_string(),
			now,
		)
		.unwrap();

		assert_eq!(order.total_amount, Decimal::new(2899, 2));
		assert_eq!(order.status, OrderStatus::Placed);
		assert_eq!(order.status_history.len(), 1);
		let creation = &order.status_history[0];
		assert_eq!(creation.from_status, None);
		assert_eq!(creation.to_status, OrderStatus::Placed);
		assert_eq!(creation.changed_by, "c1");
		assert_eq!(creation.role, Role::Customer);
		assert_eq!(order.created_at, now);
		assert!(order.driver_id.is_none());
	}

	#[test]
	fn test_place_rejects_overflowing_total() {
		let huge = Decimal::from(10u64.pow(19)) * Decimal::from(10);
		assert_eq!(item(huge, 4_000_000_000).line_total(), None);

		let near_max = Decimal::MAX - Decimal::ONE;
		let order = Order::place(
			"o1".to_string(),
			"c1".to_string(),
			"r1".to_string(),
			vec![item(near_max, 1), item(near_max, 1)],
			"1 Main St".to_string(),
			Utc::now(),
		);
		assert!(order.is_none());
	}

	#[test]
	fn test_order_document_field_names() {
		let order = Order::place(
			"o1".to_string(),
			"c1".to_string(),
			"r1".to_string(),
			vec![item(Decimal::new(500, 2), 1)],
			"1 Main St".to_string(),
			Utc::now(),
		)
		.unwrap();
		let value = serde_json::to_value(&order).unwrap();

		for field in [
			"id",
			"customer_id",
			"restaurant_id",
			"items",
			"total_amount",
			"status",
			"status_history",
			"delivery_address",
			"created_at",
			"updated_at",
		] {
			assert!(value.get(field).is_some(), "missing field {}", field);
		}
		assert!(value.get("driver_id").is_none());
		assert_eq!(value["status"], "PLACED");
		assert!(value["status_history"][0]["from_status"].is_null());

		let back: Order = serde_json::from_value(value).unwrap();
		assert_eq!(back, order);
	}
}
