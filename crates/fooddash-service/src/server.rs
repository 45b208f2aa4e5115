//! HTTP server for the FoodDash API.
//!
//! Public routes cover health, users and menu reads. Everything that acts on
//! behalf of a caller sits behind [`auth::require_actor`].

use crate::{
	apis::{menu, order, user},
	auth,
};
use axum::{
	extract::DefaultBodyLimit,
	middleware,
	response::Json,
	routing::{delete, get, patch, post},
	Router,
};
use fooddash_config::ApiConfig;
use fooddash_core::FooddashEngine;
use fooddash_types::HealthResponse;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the engine behind every handler.
	pub engine: Arc<FooddashEngine>,
}

/// Builds the complete router with its middleware stack.
pub fn build_router(state: AppState, api_config: &ApiConfig) -> Router {
	let auth = middleware::from_fn(auth::require_actor);

	let protected = Router::new()
		.route(
			"/restaurants/{id}/menu/{item_id}",
			delete(menu::delete_menu_item),
		)
		.route("/orders", post(order::create_order).get(order::list_orders))
		.route("/orders/{id}", get(order::get_order))
		.route("/orders/{id}/status", patch(order::update_order_status))
		.route("/orders/{id}/history", get(order::get_order_history))
		.route(
			"/orders/{id}/transitions",
			get(order::get_allowed_transitions),
		)
		.route_layer(auth.clone());

	let api_routes = Router::new()
		.route("/users", post(user::register_user).get(user::list_users))
		.route("/users/{id}", get(user::get_user))
		.route(
			"/restaurants/{id}/menu",
			get(menu::get_menu).merge(post(menu::add_menu_item).route_layer(auth)),
		)
		.merge(protected);

	Router::new()
		.route("/health", get(health))
		.nest("/api", api_routes)
		.layer(DefaultBodyLimit::max(api_config.max_request_size))
		.layer(TimeoutLayer::new(Duration::from_secs(
			api_config.timeout_seconds,
		)))
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Starts the HTTP server and serves until Ctrl+C.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<FooddashEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(AppState { engine }, &api_config);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("FoodDash API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("Received shutdown signal"),
		Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
	}
}

/// Handles GET /health requests.
async fn health() -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "ok".to_string(),
	})
}
