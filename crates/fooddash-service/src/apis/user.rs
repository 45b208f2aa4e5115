//! User endpoints. All of them are public.

use crate::apis::{internal_error, json_body, non_empty};
use crate::server::AppState;
use axum::{
	extract::{rejection::JsonRejection, Path, Query, State},
	http::StatusCode,
	Json,
};
use fooddash_core::handlers::UserError;
use fooddash_types::{APIError, CreateUserRequest, Role, User};
use serde::Deserialize;

/// Query string of `GET /api/users`.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
	pub role: Option<String>,
}

fn user_error(error: UserError) -> APIError {
	match error {
		UserError::InvalidInput(message) => APIError::bad_request(message),
		UserError::NotFound(_) => APIError::not_found("User not found"),
		UserError::Storage(e) => internal_error(e),
	}
}

/// Handles POST /api/users requests.
pub async fn register_user(
	State(state): State<AppState>,
	payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), APIError> {
	let request = json_body(payload)?;
	let user = state.engine.users().register(request).await.map_err(user_error)?;
	Ok((StatusCode::CREATED, Json(user)))
}

/// Handles GET /api/users requests, optionally filtered by `?role=`.
pub async fn list_users(
	State(state): State<AppState>,
	Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<User>>, APIError> {
	let role = non_empty(query.role)
		.map(|role| role.parse::<Role>())
		.transpose()
		.map_err(|e| APIError::bad_request(e.to_string()))?;

	let users = state.engine.users().list(role).await.map_err(user_error)?;
	Ok(Json(users))
}

/// Handles GET /api/users/{id} requests.
pub async fn get_user(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<User>, APIError> {
	let user = state.engine.users().get(&id).await.map_err(user_error)?;
	Ok(Json(user))
}
