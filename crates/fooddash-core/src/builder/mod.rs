//! Builder pattern for constructing FoodDash engines.
//!
//! The storage backend is chosen by name from a map of factories, so the
//! binary decides which implementations exist and the configuration decides
//! which one is used.

use crate::engine::FooddashEngine;
use fooddash_config::Config;
use fooddash_storage::{StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Container for the factory functions needed to build a FooddashEngine.
pub struct EngineFactories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

/// Builder for constructing a FooddashEngine with pluggable storage.
pub struct EngineBuilder {
	config: Config,
}

impl EngineBuilder {
	/// Creates a new EngineBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the engine with the primary storage implementation.
	///
	/// Only the primary backend is instantiated; the file backend locks its
	/// directory, so creating unused backends would hold locks for nothing.
	pub fn build<SF>(self, factories: EngineFactories<SF>) -> Result<FooddashEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let primary = &self.config.storage.primary;
		let storage_config = self.config.storage.primary_config().ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary storage '{}' not found in implementations",
				primary
			))
		})?;
		let factory = factories.storage_factories.get(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!("storage implementation '{}'", primary))
		})?;

		let backend = match factory(storage_config) {
			Ok(backend) => {
				tracing::info!(component = "storage", implementation = %primary, "Loaded");
				backend
			},
			Err(e) => {
				tracing::error!(
					component = "storage",
					implementation = %primary,
					error = %e,
					"Failed to create storage implementation"
				);
				return Err(BuilderError::Config(format!(
					"Failed to create storage implementation '{}': {}",
					primary, e
				)));
			},
		};

		let storage = Arc::new(StorageService::new(backend));
		Ok(FooddashEngine::new(self.config, storage))
	}
}
