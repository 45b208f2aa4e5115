//! Request handlers for users, menus and orders.
//!
//! Each handler owns the validation and persistence rules of one resource.
//! Order status changes go through the state machine, never through storage
//! directly.

pub mod menu;
pub mod order;
pub mod user;

pub use menu::{MenuError, MenuHandler};
pub use order::{OrderError, OrderHandler};
pub use user::{UserError, UserHandler};
