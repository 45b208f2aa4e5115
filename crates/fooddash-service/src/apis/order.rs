//! Order endpoints. Every route here requires an authenticated actor.
//!
//! Transition rejections keep their exact message: terminal and illegal
//! transitions answer 400, a role that may not take an existing edge
//! answers 403.

use crate::apis::{internal_error, json_body, non_empty};
use crate::server::AppState;
use axum::{
	extract::{rejection::JsonRejection, Path, Query, State},
	http::StatusCode,
	Extension, Json,
};
use fooddash_core::handlers::OrderError;
use fooddash_core::state::{OrderStateError, RejectionKind};
use fooddash_types::{
	APIError, Actor, AllowedTransitionsResponse, CreateOrderRequest, Order, OrderStatus,
	StatusChange, UpdateStatusRequest,
};
use serde::Deserialize;

/// Query string of `GET /api/orders`.
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
	pub status: Option<String>,
}

fn order_error(error: OrderError) -> APIError {
	match error {
		OrderError::InvalidInput(message) => APIError::bad_request(message),
		OrderError::Forbidden(message) => APIError::forbidden(message),
		OrderError::State(OrderStateError::Rejected(rejection)) => match rejection.kind() {
			RejectionKind::Terminal | RejectionKind::IllegalTransition => {
				APIError::bad_request(rejection.to_string())
			},
			RejectionKind::Unauthorized => APIError::forbidden(rejection.to_string()),
		},
		OrderError::State(OrderStateError::OrderNotFound(_)) => {
			APIError::not_found("Order not found")
		},
		OrderError::State(OrderStateError::Storage(e) | OrderStateError::Interrupted(e))
		| OrderError::Storage(e) => internal_error(e),
	}
}

/// Handles POST /api/orders requests.
pub async fn create_order(
	State(state): State<AppState>,
	Extension(actor): Extension<Actor>,
	payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), APIError> {
	let request = json_body(payload)?;
	let order = state
		.engine
		.orders()
		.create(&actor, request)
		.await
		.map_err(order_error)?;
	Ok((StatusCode::CREATED, Json(order)))
}

/// Handles GET /api/orders requests, optionally filtered by `?status=`.
pub async fn list_orders(
	State(state): State<AppState>,
	Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, APIError> {
	let status = non_empty(query.status)
		.map(|status| status.parse::<OrderStatus>())
		.transpose()
		.map_err(|e| APIError::bad_request(e.to_string()))?;

	let orders = state.engine.orders().list(status).await.map_err(order_error)?;
	Ok(Json(orders))
}

/// Handles GET /api/orders/{id} requests.
pub async fn get_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Order>, APIError> {
	let order = state.engine.orders().get(&id).await.map_err(order_error)?;
	Ok(Json(order))
}

/// Handles PATCH /api/orders/{id}/status requests.
///
/// The body is checked before the order is looked up, so a malformed body
/// answers 400 even for an unknown order.
pub async fn update_order_status(
	State(state): State<AppState>,
	Extension(actor): Extension<Actor>,
	Path(id): Path<String>,
	payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Order>, APIError> {
	let request = json_body(payload)?;
	let order = state
		.engine
		.orders()
		.update_status(&id, request.status, &actor)
		.await
		.map_err(order_error)?;
	Ok(Json(order))
}

/// Handles GET /api/orders/{id}/history requests.
pub async fn get_order_history(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Vec<StatusChange>>, APIError> {
	let history = state.engine.orders().history(&id).await.map_err(order_error)?;
	Ok(Json(history))
}

/// Handles GET /api/orders/{id}/transitions requests.
pub async fn get_allowed_transitions(
	State(state): State<AppState>,
	Extension(actor): Extension<Actor>,
	Path(id): Path<String>,
) -> Result<Json<AllowedTransitionsResponse>, APIError> {
	let response = state
		.engine
		.orders()
		.allowed_transitions(&id, actor.role)
		.await
		.map_err(order_error)?;
	Ok(Json(response))
}
