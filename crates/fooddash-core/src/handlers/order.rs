//! Order handler for placing, querying and advancing orders.
//!
//! Status changes are delegated to the [`OrderStateMachine`]; this handler
//! adds order creation from a restaurant's menu and the read-only queries.

use crate::state::{allowed_targets, OrderStateError, OrderStateMachine};
use chrono::Utc;
use fooddash_storage::{StorageError, StorageService};
use fooddash_types::{
	truncate_id, Actor, AllowedTransitionsResponse, CreateOrderRequest, MenuItem, Order,
	OrderItem, OrderStatus, Role, StatusChange, StorageKey, User,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur during order processing.
#[derive(Debug, Error)]
pub enum OrderError {
	#[error("{0}")]
	InvalidInput(String),
	#[error("{0}")]
	Forbidden(String),
	#[error(transparent)]
	State(#[from] OrderStateError),
	#[error("Storage error: {0}")]
	Storage(String),
}

/// Handler for the order endpoints.
pub struct OrderHandler {
	storage: Arc<StorageService>,
	state_machine: Arc<OrderStateMachine>,
}

impl OrderHandler {
	pub fn new(storage: Arc<StorageService>, state_machine: Arc<OrderStateMachine>) -> Self {
		Self {
			storage,
			state_machine,
		}
	}

	/// Places a new order for the calling customer.
	///
	/// Every line is priced from the restaurant's current menu; the total is
	/// the exact decimal sum of the lines.
	#[instrument(skip_all, fields(customer_id = %truncate_id(&actor.id)))]
	pub async fn create(
		&self,
		actor: &Actor,
		request: CreateOrderRequest,
	) -> Result<Order, OrderError> {
		if actor.role != Role::Customer {
			return Err(OrderError::Forbidden(
				"Only customers can create orders".into(),
			));
		}
		if request.restaurant_id.is_empty() {
			return Err(OrderError::InvalidInput("restaurant_id is required".into()));
		}
		if request.items.is_empty() {
			return Err(OrderError::InvalidInput(
				"At least one item is required".into(),
			));
		}
		if request.delivery_address.trim().is_empty() {
			return Err(OrderError::InvalidInput(
				"delivery_address is required".into(),
			));
		}

		match self
			.load::<User>(StorageKey::Users, &request.restaurant_id)
			.await?
		{
			Some(user) if user.role == Role::Restaurant => {},
			_ => return Err(OrderError::InvalidInput("Invalid restaurant_id".into())),
		}

		let mut items = Vec::with_capacity(request.items.len());
		for line in &request.items {
			if line.quantity < 1 {
				return Err(OrderError::InvalidInput(
					"Quantity must be at least 1".into(),
				));
			}
			let quantity = u32::try_from(line.quantity)
				.map_err(|_| OrderError::InvalidInput("Quantity is too large".into()))?;

			let menu_item = self
				.load::<MenuItem>(StorageKey::MenuItems, &line.menu_item_id)
				.await?
				.ok_or_else(|| {
					OrderError::InvalidInput(format!("Menu item not found: {}", line.menu_item_id))
				})?;
			if menu_item.restaurant_id != request.restaurant_id {
				return Err(OrderError::InvalidInput(format!(
					"Menu item {} does not belong to this restaurant",
					menu_item.name
				)));
			}
			if !menu_item.available {
				return Err(OrderError::InvalidInput(format!(
					"Menu item '{}' is currently unavailable",
					menu_item.name
				)));
			}

			items.push(OrderItem {
				menu_item_id: menu_item.id,
				name: menu_item.name,
				quantity,
				price: menu_item.price,
			});
		}

		let order = Order::place(
			uuid::Uuid::new_v4().to_string(),
			actor.id.clone(),
			request.restaurant_id,
			items,
			request.delivery_address,
			Utc::now(),
		)
		.ok_or_else(|| OrderError::InvalidInput("Order total is too large".into()))?;
		self.state_machine.store_order(&order).await?;

		tracing::info!(
			order_id = %truncate_id(&order.id),
			total = %order.total_amount,
			"Order placed"
		);
		Ok(order)
	}

	/// Lists orders oldest first, optionally only those in `status`.
	pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, OrderError> {
		let mut orders: Vec<Order> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(|e| OrderError::Storage(e.to_string()))?;

		orders.retain(|order| status.is_none_or(|status| order.status == status));
		orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
		Ok(orders)
	}

	pub async fn get(&self, order_id: &str) -> Result<Order, OrderError> {
		Ok(self.state_machine.get_order(order_id).await?)
	}

	/// The order's audit trail, oldest first.
	pub async fn history(&self, order_id: &str) -> Result<Vec<StatusChange>, OrderError> {
		Ok(self.get(order_id).await?.status_history)
	}

	/// Statuses the caller's role may move the order to next.
	pub async fn allowed_transitions(
		&self,
		order_id: &str,
		role: Role,
	) -> Result<AllowedTransitionsResponse, OrderError> {
		let order = self.get(order_id).await?;
		Ok(AllowedTransitionsResponse {
			current_status: order.status,
			allowed_transitions: allowed_targets(order.status, Some(role)),
		})
	}

	pub async fn update_status(
		&self,
		order_id: &str,
		requested: OrderStatus,
		actor: &Actor,
	) -> Result<Order, OrderError> {
		Ok(self
			.state_machine
			.apply_transition(order_id, requested, &actor.id, actor.role)
			.await?)
	}

	async fn load<T: serde::de::DeserializeOwned>(
		&self,
		key: StorageKey,
		id: &str,
	) -> Result<Option<T>, OrderError> {
		match self.storage.retrieve(key.as_str(), id).await {
			Ok(value) => Ok(Some(value)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(OrderError::Storage(e.to_string())),
		}
	}
}
