//! Order state machine implementation.
//!
//! The only code path that changes an order's status. Each transition runs
//! load, validate, mutate and save under a lock owned by that order, so
//! requests against one order are serialized while different orders proceed
//! in parallel.

use super::transitions::{self, TransitionRejection};
use chrono::Utc;
use dashmap::DashMap;
use fooddash_storage::{StorageError, StorageService};
use fooddash_types::{truncate_id, Order, OrderStatus, Role, StatusChange, StorageKey};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{instrument, Instrument};

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	/// The transition table refused the change; nothing was written.
	#[error(transparent)]
	Rejected(#[from] TransitionRejection),
	#[error("order not found: {0}")]
	OrderNotFound(String),
	#[error("Storage error: {0}")]
	Storage(String),
	/// The task running the transition panicked or was cancelled.
	#[error("Transition interrupted: {0}")]
	Interrupted(String),
}

type LockTable = DashMap<String, Arc<Mutex<()>>>;

/// Exclusive access to one order, released on drop.
///
/// Dropping the lease also removes the order's lock from the table once no
/// other task holds or waits on it.
struct OrderLease {
	locks: Arc<LockTable>,
	order_id: String,
	guard: Option<OwnedMutexGuard<()>>,
}

impl OrderLease {
	async fn acquire(locks: Arc<LockTable>, order_id: &str) -> Self {
		let lock = locks.entry(order_id.to_string()).or_default().clone();
		let guard = lock.lock_owned().await;
		Self {
			locks,
			order_id: order_id.to_string(),
			guard: Some(guard),
		}
	}
}

impl Drop for OrderLease {
	fn drop(&mut self) {
		self.guard.take();
		self.locks
			.remove_if(&self.order_id, |_, lock| Arc::strong_count(lock) == 1);
	}
}

/// Manages order state transitions and persistence
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
	locks: Arc<LockTable>,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			storage,
			locks: Arc::new(DashMap::new()),
		}
	}

	/// Moves an order to `requested` on behalf of `actor_id` acting as `role`.
	///
	/// On success exactly one write is made: the history entry, the new
	/// status and `updated_at` are saved together. A rejection or a failed
	/// load writes nothing. The first transition into `PICKED_UP` binds the
	/// actor as the order's driver when none is set.
	///
	/// The locked section runs on its own task, so a caller that stops
	/// waiting does not interrupt a transition halfway through its save.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id), to = %requested, role = %role))]
	pub async fn apply_transition(
		&self,
		order_id: &str,
		requested: OrderStatus,
		actor_id: &str,
		role: Role,
	) -> Result<Order, OrderStateError> {
		let storage = self.storage.clone();
		let locks = self.locks.clone();
		let order_id = order_id.to_string();
		let actor_id = actor_id.to_string();

		let task = tokio::spawn(
			async move {
				let _lease = OrderLease::acquire(locks, &order_id).await;
				transition_locked(&storage, &order_id, requested, &actor_id, role).await
			}
			.in_current_span(),
		);

		task.await
			.map_err(|e| OrderStateError::Interrupted(e.to_string()))?
	}

	/// Gets an order by ID
	pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderStateError> {
		load_order(&self.storage, order_id).await
	}

	/// Stores a new order
	pub async fn store_order(&self, order: &Order) -> Result<(), OrderStateError> {
		save_order(&self.storage, order).await
	}

	#[cfg(test)]
	fn tracked_locks(&self) -> usize {
		self.locks.len()
	}
}

async fn transition_locked(
	storage: &StorageService,
	order_id: &str,
	requested: OrderStatus,
	actor_id: &str,
	role: Role,
) -> Result<Order, OrderStateError> {
	let mut order = load_order(storage, order_id).await?;
	let from = order.status;

	if let Err(rejection) = transitions::validate(from, requested, role) {
		tracing::debug!(from = %from, error = %rejection, "Transition rejected");
		return Err(rejection.into());
	}

	let now = Utc::now();
	if requested == OrderStatus::PickedUp && order.driver_id.is_none() {
		order.driver_id = Some(actor_id.to_string());
	}
	order.status_history.push(StatusChange {
		from_status: Some(from),
		to_status: requested,
		changed_by: actor_id.to_string(),
		role,
		timestamp: now,
	});
	order.status = requested;
	order.updated_at = now;

	save_order(storage, &order).await?;

	tracing::info!(from = %from, "Order status updated");
	Ok(order)
}

async fn load_order(storage: &StorageService, order_id: &str) -> Result<Order, OrderStateError> {
	storage
		.retrieve(StorageKey::Orders.as_str(), order_id)
		.await
		.map_err(|e| match e {
			StorageError::NotFound => OrderStateError::OrderNotFound(order_id.to_string()),
			e => OrderStateError::Storage(e.to_string()),
		})
}

async fn save_order(storage: &StorageService, order: &Order) -> Result<(), OrderStateError> {
	storage
		.store(StorageKey::Orders.as_str(), &order.id, order)
		.await
		.map_err(|e| OrderStateError::Storage(e.to_string()))
}
