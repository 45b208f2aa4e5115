//! Core engine for the FoodDash order service.
//!
//! This crate holds the order lifecycle: the role-gated transition table and
//! its validator, the per-order locked state machine that applies accepted
//! transitions, and the user, menu and order handlers built on top of them.

pub mod builder;
pub mod engine;
pub mod handlers;
pub mod state;

pub use builder::{BuilderError, EngineBuilder, EngineFactories};
pub use engine::FooddashEngine;
