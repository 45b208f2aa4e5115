//! Main entry point for the FoodDash order service.
//!
//! This binary serves the FoodDash HTTP API: user registration, restaurant
//! menus, order placement and the role-gated order status lifecycle.

use clap::Parser;
use fooddash_config::Config;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod auth;
mod factory_registry;
mod server;

/// Command-line arguments for the FoodDash service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the FoodDash service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the engine with the configured storage backend
/// 5. Serves the API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started fooddash");

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let api_config = config.api_or_default();
	let engine = Arc::new(factory_registry::build_engine(config)?);

	if api_config.enabled {
		server::start_server(api_config, engine).await?;
	} else {
		tracing::warn!("API server disabled in configuration, nothing to serve");
	}

	tracing::info!("Stopped fooddash");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_args_default_values() {
		let args = Args::parse_from(["fooddash"]);

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::parse_from(["fooddash", "--config", "custom.toml", "-l", "debug"]);

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
	}

	#[tokio::test]
	async fn test_config_file_builds_engine() {
		let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
		let config_path = temp_dir.path().join("config.toml");
		let storage_path = temp_dir.path().join("storage");

		let config_content = format!(
			r#"
[service]
id = "test-file-service"

[storage]
primary = "file"

[storage.implementations.file]
storage_path = {:?}

[storage.implementations.memory]

[api]
enabled = true
port = 9090
"#,
			storage_path.display().to_string()
		);
		std::fs::write(&config_path, config_content).expect("Failed to write config");

		let config = Config::from_file(&config_path)
			.await
			.expect("Failed to load config");
		assert_eq!(config.service.id, "test-file-service");
		assert_eq!(config.api_or_default().port, 9090);

		let engine = factory_registry::build_engine(config).expect("Failed to build engine");
		assert_eq!(engine.config().storage.primary, "file");
		assert!(storage_path.join(".lock").exists());
	}
}
