//! User handler for registration and lookup.

use fooddash_storage::{StorageError, StorageService};
use fooddash_types::{CreateUserRequest, Role, StorageKey, User};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur while managing users.
#[derive(Debug, Error)]
pub enum UserError {
	#[error("{0}")]
	InvalidInput(String),
	#[error("user not found: {0}")]
	NotFound(String),
	#[error("Storage error: {0}")]
	Storage(String),
}

/// Handler for registering and querying users.
pub struct UserHandler {
	storage: Arc<StorageService>,
}

impl UserHandler {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Registers a new user under a fresh id.
	#[instrument(skip_all, fields(role = %request.role))]
	pub async fn register(&self, request: CreateUserRequest) -> Result<User, UserError> {
		let name = request.name.trim();
		if name.is_empty() {
			return Err(UserError::InvalidInput("Name is required".into()));
		}
		let role: Role = request
			.role
			.parse()
			.map_err(|e: fooddash_types::ParseRoleError| UserError::InvalidInput(e.to_string()))?;

		let user = User {
			id: uuid::Uuid::new_v4().to_string(),
			name: name.to_string(),
			role,
		};
		self.storage
			.store(StorageKey::Users.as_str(), &user.id, &user)
			.await
			.map_err(|e| UserError::Storage(e.to_string()))?;

		tracing::info!(user_id = %user.id, "Registered user");
		Ok(user)
	}

	pub async fn get(&self, user_id: &str) -> Result<User, UserError> {
		self.storage
			.retrieve(StorageKey::Users.as_str(), user_id)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => UserError::NotFound(user_id.to_string()),
				e => UserError::Storage(e.to_string()),
			})
	}

	/// Lists users ordered by id, optionally only those with `role`.
	pub async fn list(&self, role: Option<Role>) -> Result<Vec<User>, UserError> {
		let users: Vec<User> = self
			.storage
			.retrieve_all(StorageKey::Users.as_str())
			.await
			.map_err(|e| UserError::Storage(e.to_string()))?;

		Ok(users
			.into_iter()
			.filter(|user| role.is_none_or(|role| user.role == role))
			.collect())
	}
}
