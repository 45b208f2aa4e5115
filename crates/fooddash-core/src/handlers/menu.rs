//! Menu handler for restaurant-owned menu items.
//!
//! Anyone may read a menu. Only the restaurant itself may add or remove items.

use fooddash_storage::{StorageError, StorageService};
use fooddash_types::{truncate_id, Actor, CreateMenuItemRequest, MenuItem, Role, StorageKey};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

const DEFAULT_CATEGORY: &str = "General";

/// Errors that can occur while managing menus.
#[derive(Debug, Error)]
pub enum MenuError {
	#[error("{0}")]
	InvalidInput(String),
	#[error("{0}")]
	Forbidden(String),
	#[error("{0}")]
	NotFound(String),
	#[error("Storage error: {0}")]
	Storage(String),
}

/// Handler for menu reads and restaurant-only menu edits.
pub struct MenuHandler {
	storage: Arc<StorageService>,
}

impl MenuHandler {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Adds a dish to `restaurant_id`'s menu.
	///
	/// The caller must be that restaurant. Items start out available and
	/// fall back to the "General" category.
	#[instrument(skip_all, fields(restaurant_id = %truncate_id(restaurant_id)))]
	pub async fn add_item(
		&self,
		restaurant_id: &str,
		actor: &Actor,
		request: CreateMenuItemRequest,
	) -> Result<MenuItem, MenuError> {
		if actor.role != Role::Restaurant {
			return Err(MenuError::Forbidden(
				"Only restaurants can manage menus".into(),
			));
		}
		if actor.id != restaurant_id {
			return Err(MenuError::Forbidden(
				"You can only manage your own menu".into(),
			));
		}

		let name = request.name.trim();
		if name.is_empty() {
			return Err(MenuError::InvalidInput("Dish name is required".into()));
		}
		if request.price <= Decimal::ZERO {
			return Err(MenuError::InvalidInput(
				"Price must be greater than 0".into(),
			));
		}
		let category = match request.category.trim() {
			"" => DEFAULT_CATEGORY.to_string(),
			category => category.to_string(),
		};

		let item = MenuItem {
			id: uuid::Uuid::new_v4().to_string(),
			restaurant_id: restaurant_id.to_string(),
			name: name.to_string(),
			description: request.description,
			price: request.price,
			category,
			available: true,
			image_url: request.image_url,
		};
		self.storage
			.store(StorageKey::MenuItems.as_str(), &item.id, &item)
			.await
			.map_err(|e| MenuError::Storage(e.to_string()))?;

		tracing::info!(item_id = %truncate_id(&item.id), "Added menu item");
		Ok(item)
	}

	/// Lists every item on a restaurant's menu.
	pub async fn list(&self, restaurant_id: &str) -> Result<Vec<MenuItem>, MenuError> {
		let items: Vec<MenuItem> = self
			.storage
			.retrieve_all(StorageKey::MenuItems.as_str())
			.await
			.map_err(|e| MenuError::Storage(e.to_string()))?;

		Ok(items
			.into_iter()
			.filter(|item| item.restaurant_id == restaurant_id)
			.collect())
	}

	pub async fn get_item(&self, item_id: &str) -> Result<MenuItem, MenuError> {
		self.storage
			.retrieve(StorageKey::MenuItems.as_str(), item_id)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => MenuError::NotFound("Menu item not found".into()),
				e => MenuError::Storage(e.to_string()),
			})
	}

	/// Removes an item from the caller's own menu.
	#[instrument(skip_all, fields(restaurant_id = %truncate_id(restaurant_id), item_id = %truncate_id(item_id)))]
	pub async fn delete_item(
		&self,
		restaurant_id: &str,
		item_id: &str,
		actor: &Actor,
	) -> Result<(), MenuError> {
		if actor.role != Role::Restaurant || actor.id != restaurant_id {
			return Err(MenuError::Forbidden(
				"You can only manage your own menu".into(),
			));
		}

		let item = self.get_item(item_id).await?;
		if item.restaurant_id != restaurant_id {
			return Err(MenuError::Forbidden(
				"Item does not belong to your restaurant".into(),
			));
		}

		self.storage
			.remove(StorageKey::MenuItems.as_str(), item_id)
			.await
			.map_err(|e| MenuError::Storage(e.to_string()))?;

		tracing::info!("Deleted menu item");
		Ok(())
	}
}
