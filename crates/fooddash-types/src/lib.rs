//! Common types module for the FoodDash order service.
//!
//! This module defines the core data types shared by every FoodDash crate:
//! the order aggregate and its status history, users and their roles, menu
//! items, HTTP request/response shapes and configuration validation helpers.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Menu item types owned by restaurants.
pub mod menu;
/// Order aggregate, status enumeration and audit trail.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Storage types for managing persistent data.
pub mod storage;
/// User and role types.
pub mod user;
/// Utility functions for display formatting.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use menu::*;
pub use order::*;
pub use registry::*;
pub use storage::*;
pub use user::*;
pub use utils::truncate_id;
pub use validation::*;
