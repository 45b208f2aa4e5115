//! HTTP handlers for the FoodDash API.
//!
//! Each submodule turns the core handler errors of one resource into
//! [`APIError`] responses.

pub mod menu;
pub mod order;
pub mod user;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use fooddash_types::APIError;
use std::fmt::Display;

/// Unwraps a JSON body, answering 400 for anything that did not parse.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, APIError> {
	match payload {
		Ok(Json(body)) => Ok(body),
		Err(rejection) => {
			tracing::debug!(error = %rejection, "Rejected request body");
			Err(APIError::bad_request("Invalid request body"))
		},
	}
}

/// Logs a backend failure and hides its details from the caller.
pub(crate) fn internal_error(error: impl Display) -> APIError {
	tracing::error!(error = %error, "Request failed");
	APIError::internal("Internal server error")
}

/// Treats an empty query value the same as an absent one.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}
