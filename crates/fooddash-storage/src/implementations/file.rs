//! File-based storage backend for the FoodDash service.
//!
//! Each entity is one JSON document at `<storage_path>/<namespace>/<id>.json`.
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so readers never see a half-written document. The backend
//! holds an exclusive lock on `<storage_path>/.lock` for its whole lifetime.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use fooddash_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

const DEFAULT_STORAGE_PATH: &str = "./data/storage";
const LOCK_FILE: &str = ".lock";
const EXTENSION: &str = "json";

/// File-based storage implementation.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
	/// Held open so the advisory lock lasts as long as the backend.
	_lock: File,
	/// Suffix source for temporary files.
	write_seq: AtomicU64,
}

impl FileStorage {
	/// Opens (creating if needed) a storage directory and locks it.
	///
	/// Fails with `StorageError::Configuration` when another process, or
	/// another backend instance, already holds the directory.
	pub fn new(base_path: PathBuf) -> Result<Self, StorageError> {
		std::fs::create_dir_all(&base_path)
			.map_err(|e| StorageError::Backend(format!("{}: {}", base_path.display(), e)))?;

		let lock_path = base_path.join(LOCK_FILE);
		let lock = std::fs::OpenOptions::new()
			.create(true)
			.truncate(false)
			.write(true)
			.open(&lock_path)
			.map_err(|e| StorageError::Backend(format!("{}: {}", lock_path.display(), e)))?;
		lock.try_lock_exclusive().map_err(|_| {
			StorageError::Configuration(format!(
				"storage directory {} is locked by another process",
				base_path.display()
			))
		})?;

		tracing::debug!(path = %base_path.display(), "Opened file storage");

		Ok(Self {
			base_path,
			_lock: lock,
			write_seq: AtomicU64::new(0),
		})
	}

	/// Maps `namespace:id` to `<base>/<namespace>/<id>.json`.
	fn get_file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
		let (namespace, id) = key
			.split_once(':')
			.filter(|(namespace, id)| !namespace.is_empty() && !id.is_empty())
			.ok_or_else(|| StorageError::Backend(format!("invalid storage key '{}'", key)))?;

		Ok(self
			.base_path
			.join(sanitize(namespace))
			.join(format!("{}.{}", sanitize(id), EXTENSION)))
	}

	/// Collects the keys stored in one namespace directory.
	async fn namespace_keys(&self, namespace: &str, dir: &Path) -> Result<Vec<String>, StorageError> {
		let mut keys = Vec::new();
		let mut entries = match fs::read_dir(dir).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() != Some(std::ffi::OsStr::new(EXTENSION)) {
				continue;
			}
			if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
				keys.push(format!("{}:{}", namespace, id));
			}
		}
		Ok(keys)
	}
}

fn sanitize(segment: &str) -> String {
	segment.replace(['/', '\\'], "_")
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key)?;

		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key)?;

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		// Write atomically by writing to temp file then renaming
		let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
		let temp_path = path.with_extension(format!("{}.tmp", seq));
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		if let Err(e) = fs::rename(&temp_path, &path).await {
			let _ = fs::remove_file(&temp_path).await;
			return Err(StorageError::Backend(e.to_string()));
		}

		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key)?;

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
		let mut keys = match prefix.split_once(':') {
			Some((namespace, _)) => {
				let dir = self.base_path.join(sanitize(namespace));
				self.namespace_keys(namespace, &dir).await?
			},
			None => {
				let mut keys = Vec::new();
				let mut entries = fs::read_dir(&self.base_path)
					.await
					.map_err(|e| StorageError::Backend(e.to_string()))?;
				while let Some(entry) = entries
					.next_entry()
					.await
					.map_err(|e| StorageError::Backend(e.to_string()))?
				{
					let path = entry.path();
					if !path.is_dir() {
						continue;
					}
					if let Some(namespace) = path.file_name().and_then(|s| s.to_str()) {
						keys.extend(self.namespace_keys(namespace, &path).await?);
					}
				}
				keys
			},
		};

		keys.retain(|key| key.starts_with(prefix));
		keys.sort();
		Ok(keys)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("storage_path", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(path) if path.trim().is_empty() => {
							Err("storage_path cannot be empty".to_string())
						},
						_ => Ok(()),
					}
				}),
			],
		);

		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for file storage (default: "./data/storage")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_STORAGE_PATH);

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path))?))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = crate::StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl crate::StorageRegistry for Registry {}
