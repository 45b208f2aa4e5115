//! Registry trait for self-registering implementations.
//!
//! Pluggable backends declare the name they are configured under together
//! with the factory that builds them.

/// Base trait for implementation registries.
///
/// Each implementation module (currently the storage backends) provides a
/// Registry struct that implements this trait.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. "file" for `storage.implementations.file`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
