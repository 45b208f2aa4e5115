//! Core FoodDash engine.
//!
//! The engine wires one storage service into the state machine and the
//! resource handlers and hands them to the HTTP layer. It is cheap to clone:
//! every component sits behind an `Arc`.

use crate::handlers::{MenuHandler, OrderHandler, UserHandler};
use crate::state::OrderStateMachine;
use fooddash_config::Config;
use fooddash_storage::StorageService;
use std::sync::Arc;

/// Main engine holding the shared services of a FoodDash instance.
#[derive(Clone)]
pub struct FooddashEngine {
	/// Service configuration.
	pub(crate) config: Config,
	/// User handler
	pub(crate) user_handler: Arc<UserHandler>,
	/// Menu handler
	pub(crate) menu_handler: Arc<MenuHandler>,
	/// Order handler
	pub(crate) order_handler: Arc<OrderHandler>,
}

impl FooddashEngine {
	/// Creates a new engine over the given storage service.
	pub fn new(config: Config, storage: Arc<StorageService>) -> Self {
		let state_machine = Arc::new(OrderStateMachine::new(storage.clone()));

		let user_handler = Arc::new(UserHandler::new(storage.clone()));
		let menu_handler = Arc::new(MenuHandler::new(storage.clone()));
		let order_handler = Arc::new(OrderHandler::new(storage, state_machine));

		Self {
			config,
			user_handler,
			menu_handler,
			order_handler,
		}
	}

	/// Returns a reference to the configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn users(&self) -> &UserHandler {
		&self.user_handler
	}

	pub fn menus(&self) -> &MenuHandler {
		&self.menu_handler
	}

	pub fn orders(&self) -> &OrderHandler {
		&self.order_handler
	}
}
