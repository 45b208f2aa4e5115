//! Factory registry for pluggable implementations.
//!
//! Storage backends register themselves through
//! [`fooddash_storage::get_all_implementations`]; the configuration then picks
//! one of them by name.

use fooddash_config::Config;
use fooddash_core::{BuilderError, EngineBuilder, EngineFactories, FooddashEngine};
use fooddash_storage::StorageFactory;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global registry for all implementation factories
pub struct FactoryRegistry {
	pub storage: HashMap<String, StorageFactory>,
}

impl FactoryRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		Self {
			storage: HashMap::new(),
		}
	}

	/// Register a storage implementation
	pub fn register_storage(&mut self, name: impl Into<String>, factory: StorageFactory) {
		self.storage.insert(name.into(), factory);
	}
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Initialize the global registry with all available implementations
pub fn initialize_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in fooddash_storage::get_all_implementations() {
			tracing::debug!("Registering storage implementation: {}", name);
			registry.register_storage(name, factory);
		}

		registry
	})
}

/// Builds the engine from `config` using every registered implementation.
pub fn build_engine(config: Config) -> Result<FooddashEngine, BuilderError> {
	let registry = initialize_registry();
	let factories = EngineFactories {
		storage_factories: registry.storage.clone(),
	};

	EngineBuilder::new(config).build(factories)
}
