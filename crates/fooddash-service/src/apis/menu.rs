//! Menu endpoints.
//!
//! Reading a menu is public; adding and deleting items runs behind the
//! authentication middleware.

use crate::apis::{internal_error, json_body};
use crate::server::AppState;
use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	Extension, Json,
};
use fooddash_core::handlers::MenuError;
use fooddash_types::{APIError, Actor, CreateMenuItemRequest, MenuItem, MessageResponse};

fn menu_error(error: MenuError) -> APIError {
	match error {
		MenuError::InvalidInput(message) => APIError::bad_request(message),
		MenuError::Forbidden(message) => APIError::forbidden(message),
		MenuError::NotFound(message) => APIError::not_found(message),
		MenuError::Storage(e) => internal_error(e),
	}
}

/// Handles GET /api/restaurants/{id}/menu requests.
pub async fn get_menu(
	State(state): State<AppState>,
	Path(restaurant_id): Path<String>,
) -> Result<Json<Vec<MenuItem>>, APIError> {
	let items = state
		.engine
		.menus()
		.list(&restaurant_id)
		.await
		.map_err(menu_error)?;
	Ok(Json(items))
}

/// Handles POST /api/restaurants/{id}/menu requests.
pub async fn add_menu_item(
	State(state): State<AppState>,
	Extension(actor): Extension<Actor>,
	Path(restaurant_id): Path<String>,
	payload: Result<Json<CreateMenuItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MenuItem>), APIError> {
	let request = json_body(payload)?;
	let item = state
		.engine
		.menus()
		.add_item(&restaurant_id, &actor, request)
		.await
		.map_err(menu_error)?;
	Ok((StatusCode::CREATED, Json(item)))
}

/// Handles DELETE /api/restaurants/{id}/menu/{item_id} requests.
pub async fn delete_menu_item(
	State(state): State<AppState>,
	Extension(actor): Extension<Actor>,
	Path((restaurant_id, item_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, APIError> {
	state
		.engine
		.menus()
		.delete_item(&restaurant_id, &item_id, &actor)
		.await
		.map_err(menu_error)?;
	Ok(Json(MessageResponse {
		message: "Menu item deleted".to_string(),
	}))
}
