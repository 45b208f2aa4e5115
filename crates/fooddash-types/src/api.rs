//! API types for the FoodDash HTTP API.
//!
//! This module defines the request and response bodies of the HTTP endpoints
//! and the structured error type every handler returns.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::OrderStatus;

/// Payload for registering a new user.
///
/// The role is kept as a string so an unknown value yields a descriptive
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub role: String,
}

/// Payload for adding a dish to a restaurant's menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuItemRequest {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(with = "rust_decimal::serde::float")]
	pub price: Decimal,
	/// Defaults to "General" when empty.
	#[serde(default)]
	pub category: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
}

/// One requested line of a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
	pub menu_item_id: String,
	/// Signed so that zero and negative quantities reach validation.
	pub quantity: i64,
}

/// Payload for placing an order from a restaurant's menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	#[serde(default)]
	pub restaurant_id: String,
	#[serde(default)]
	pub items: Vec<OrderItemRequest>,
	#[serde(default)]
	pub delivery_address: String,
}

/// Payload for `PATCH /api/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
	pub status: OrderStatus,
}

/// Response of `GET /api/orders/{id}/transitions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedTransitionsResponse {
	pub current_status: OrderStatus,
	pub allowed_transitions: Vec<OrderStatus>,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
	pub message: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Human-readable description
	pub error: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Malformed input or an impossible status transition (400)
	BadRequest { message: String },
	/// Missing or unusable caller identity (401)
	Unauthorized { message: String },
	/// Caller is identified but not allowed to act (403)
	Forbidden { message: String },
	/// Referenced resource does not exist (404)
	NotFound { message: String },
	/// Internal server error (500)
	InternalServerError { message: String },
}

impl APIError {
	pub fn bad_request(message: impl Into<String>) -> Self {
		Self::BadRequest {
			message: message.into(),
		}
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::Unauthorized {
			message: message.into(),
		}
	}

	pub fn forbidden(message: impl Into<String>) -> Self {
		Self::Forbidden {
			message: message.into(),
		}
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound {
			message: message.into(),
		}
	}

	pub fn internal(message: impl Into<String>) -> Self {
		Self::InternalServerError {
			message: message.into(),
		}
	}

	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::Unauthorized { .. } => 401,
			APIError::Forbidden { .. } => 403,
			APIError::NotFound { .. } => 404,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// The message carried by this error.
	pub fn message(&self) -> &str {
		match self {
			APIError::BadRequest { message }
			| APIError::Unauthorized { message }
			| APIError::Forbidden { message }
			| APIError::NotFound { message }
			| APIError::InternalServerError { message } => message,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		ErrorResponse {
			error: self.message().to_string(),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message } => write!(f, "Bad Request: {}", message),
			APIError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
			APIError::Forbidden { message } => write!(f, "Forbidden: {}", message),
			APIError::NotFound { message } => write!(f, "Not Found: {}", message),
			APIError::InternalServerError { message } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(self.to_error_response())).into_response()
	}
}
