//! Menu item types owned by restaurants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
	/// Unique identifier for this menu item.
	pub id: String,
	/// Restaurant that owns the item.
	pub restaurant_id: String,
	pub name: String,
	#[serde(default)]
	pub description: String,
	/// Unit price.
	#[serde(with = "rust_decimal::serde::float")]
	pub price: Decimal,
	pub category: String,
	/// Whether the item can currently be ordered.
	pub available: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
}
