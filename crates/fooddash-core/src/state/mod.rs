//! Order lifecycle state management.
//!
//! `transitions` holds the static, role-gated transition table and the pure
//! functions over it. `order` applies accepted transitions to stored orders.

pub mod order;
pub mod transitions;

pub use order::{OrderStateError, OrderStateMachine};
pub use transitions::{
	all_rules, allowed_targets, is_terminal, replay_history, validate, HistoryError,
	RejectionKind, TransitionRejection, TransitionRule,
};
