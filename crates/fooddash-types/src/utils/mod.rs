//! Utility functions shared across FoodDash crates.

pub mod formatting;

pub use formatting::truncate_id;
