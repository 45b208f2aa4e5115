//! User and role types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role an actor plays in the order lifecycle.
///
/// The set is closed: every user is exactly one of these, and the transition
/// table gates each status change on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Places and may cancel orders.
	Customer,
	/// Accepts, prepares and hands over orders.
	Restaurant,
	/// Picks up and delivers orders.
	Driver,
}

impl Role {
	/// Returns the wire representation of the role.
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Customer => "customer",
			Role::Restaurant => "restaurant",
			Role::Driver => "driver",
		}
	}

	/// Returns an iterator over all roles.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::Customer, Self::Restaurant, Self::Driver].into_iter()
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a string does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role must be one of: customer, restaurant, driver")]
pub struct ParseRoleError;

impl FromStr for Role {
	type Err = ParseRoleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"customer" => Ok(Self::Customer),
			"restaurant" => Ok(Self::Restaurant),
			"driver" => Ok(Self::Driver),
			_ => Err(ParseRoleError),
		}
	}
}

/// A registered user (customer, restaurant, or driver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Unique identifier for this user.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Role this user acts under.
	pub role: Role,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
	pub id: String,
	pub role: Role,
}

impl Actor {
	pub fn new(id: impl Into<String>, role: Role) -> Self {
		Self {
			id: id.into(),
			role,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_role_round_trips_through_str() {
		for role in Role::all() {
			assert_eq!(role.as_str().parse::<Role>(), Ok(role));
			assert_eq!(role.to_string(), role.as_str());
		}
	}

	#[test]
	fn test_unknown_role_rejected() {
		assert_eq!("admin".parse::<Role>(), Err(ParseRoleError));
		assert_eq!("Customer".parse::<Role>(), Err(ParseRoleError));
		assert_eq!(
			ParseRoleError.to_string(),
			"Role must be one of: customer, restaurant, driver"
		);
	}

	#[test]
	fn test_role_serializes_lowercase() {
		let json = serde_json::to_string(&Role::Restaurant).unwrap();
		assert_eq!(json, "\"restaurant\"");
		let role: Role = serde_json::from_str("\"driver\"").unwrap();
		assert_eq!(role, Role::Driver);
	}
}
