//! Order status transition table and validator.
//!
//! The table maps every non-terminal status to the ordered list of rules
//! leaving it. Terminal statuses (`DELIVERED`, `CANCELLED`) have no entry at
//! all, so a failed lookup is the one and only terminal signal. Everything in
//! this module is pure and lock-free.

use fooddash_types::{OrderStatus, Role, StatusChange};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;

/// One legal edge of the status graph and the roles allowed to take it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRule {
	pub from: OrderStatus,
	pub to: OrderStatus,
	/// Never empty.
	pub roles: &'static [Role],
}

impl TransitionRule {
	const fn new(from: OrderStatus, to: OrderStatus, roles: &'static [Role]) -> Self {
		Self { from, to, roles }
	}

	/// Whether `role` may take this edge.
	pub fn permits(&self, role: Role) -> bool {
		self.roles.contains(&role)
	}
}

// Static transition table - each non-terminal state maps to its outgoing rules
static TRANSITIONS: Lazy<HashMap<OrderStatus, Vec<TransitionRule>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::Placed,
		vec![
			TransitionRule::new(
				OrderStatus::Placed,
				OrderStatus::Confirmed,
				&[Role::Restaurant],
			),
			TransitionRule::new(OrderStatus::Placed, OrderStatus::Cancelled, &[Role::Customer]),
		],
	);
	m.insert(
		OrderStatus::Confirmed,
		vec![
			TransitionRule::new(
				OrderStatus::Confirmed,
				OrderStatus::Preparing,
				&[Role::Restaurant],
			),
			TransitionRule::new(
				OrderStatus::Confirmed,
				OrderStatus::Cancelled,
				&[Role::Customer, Role::Restaurant],
			),
		],
	);
	m.insert(
		OrderStatus::Preparing,
		vec![TransitionRule::new(
			OrderStatus::Preparing,
			OrderStatus::ReadyForPickup,
			&[Role::Restaurant],
		)],
	);
	m.insert(
		OrderStatus::ReadyForPickup,
		vec![TransitionRule::new(
			OrderStatus::ReadyForPickup,
			OrderStatus::PickedUp,
			&[Role::Driver],
		)],
	);
	m.insert(
		OrderStatus::PickedUp,
		vec![TransitionRule::new(
			OrderStatus::PickedUp,
			OrderStatus::OutForDelivery,
			&[Role::Driver],
		)],
	);
	m.insert(
		OrderStatus::OutForDelivery,
		vec![TransitionRule::new(
			OrderStatus::OutForDelivery,
			OrderStatus::Delivered,
			&[Role::Driver],
		)],
	);
	m
});

/// Rules leaving `status`, or `None` when the status is terminal.
pub fn rules_from(status: OrderStatus) -> Option<&'static [TransitionRule]> {
	TRANSITIONS.get(&status).map(Vec::as_slice)
}

/// Every rule of the table, grouped by source status in lifecycle order.
pub fn all_rules() -> impl Iterator<Item = &'static TransitionRule> {
	OrderStatus::all().filter_map(rules_from).flatten()
}

/// Whether no transition leaves `status`.
pub fn is_terminal(status: OrderStatus) -> bool {
	rules_from(status).is_none()
}

/// Coarse classification of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
	Terminal,
	IllegalTransition,
	Unauthorized,
}

/// Why a requested status change was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionRejection {
	/// The current status has no outgoing transitions.
	#[error("no transitions allowed from status '{from}' (terminal state)")]
	Terminal { from: OrderStatus },
	/// No rule leads from the current status to the requested one, whatever the role.
	#[error(
		"invalid transition from '{from}' to '{to}'; valid transitions: [{}]",
		join_statuses(.allowed)
	)]
	IllegalTransition {
		from: OrderStatus,
		to: OrderStatus,
		/// Every target reachable from `from`, in table order.
		allowed: Vec<OrderStatus>,
	},
	/// The edge exists but the role may not take it.
	#[error("role '{role}' is not authorized to transition order from '{from}' to '{to}'")]
	Unauthorized {
		from: OrderStatus,
		to: OrderStatus,
		role: Role,
	},
}

impl TransitionRejection {
	pub fn kind(&self) -> RejectionKind {
		match self {
			TransitionRejection::Terminal { .. } => RejectionKind::Terminal,
			TransitionRejection::IllegalTransition { .. } => RejectionKind::IllegalTransition,
			TransitionRejection::Unauthorized { .. } => RejectionKind::Unauthorized,
		}
	}
}

fn join_statuses(statuses: &[OrderStatus]) -> String {
	statuses
		.iter()
		.map(OrderStatus::as_str)
		.collect::<Vec<_>>()
		.join(" ")
}

/// Decides whether `role` may move an order from `current` to `requested`.
///
/// Classification happens in one pass: terminal lookup first, then the
/// edge, then the role. On success the matching rule is returned.
pub fn validate(
	current: OrderStatus,
	requested: OrderStatus,
	role: Role,
) -> Result<&'static TransitionRule, TransitionRejection> {
	let rules = rules_from(current).ok_or(TransitionRejection::Terminal { from: current })?;

	let rule = rules
		.iter()
		.find(|rule| rule.to == requested)
		.ok_or_else(|| TransitionRejection::IllegalTransition {
			from: current,
			to: requested,
			allowed: rules.iter().map(|rule| rule.to).collect(),
		})?;

	if rule.permits(role) {
		Ok(rule)
	} else {
		Err(TransitionRejection::Unauthorized {
			from: current,
			to: requested,
			role,
		})
	}
}

/// Statuses reachable from `current` in one step, in table order.
///
/// With a role, only targets that role may request are returned. Terminal
/// statuses yield an empty list.
pub fn allowed_targets(current: OrderStatus, role: Option<Role>) -> Vec<OrderStatus> {
	rules_from(current)
		.unwrap_or_default()
		.iter()
		.filter(|rule| role.is_none_or(|role| rule.permits(role)))
		.map(|rule| rule.to)
		.collect()
}

/// Errors found while replaying a status history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	#[error("status history is empty")]
	Empty,
	#[error("status history must start with a customer creating the order in PLACED")]
	InvalidCreation,
	#[error("history entry {index} does not continue from '{expected}'")]
	BrokenLink { index: usize, expected: OrderStatus },
	#[error("history entry {index} is not a legal step: {source}")]
	IllegalStep {
		index: usize,
		#[source]
		source: TransitionRejection,
	},
}

/// Walks a status history from the empty state through the validator.
///
/// Returns the status the history ends in, which must equal the order's
/// current status for a well-formed order.
pub fn replay_history(history: &[StatusChange]) -> Result<OrderStatus, HistoryError> {
	let (creation, steps) = history.split_first().ok_or(HistoryError::Empty)?;
	if creation.from_status.is_some()
		|| creation.to_status != OrderStatus::Placed
		|| creation.role != Role::Customer
	{
		return Err(HistoryError::InvalidCreation);
	}

	let mut status = creation.to_status;
	for (offset, change) in steps.iter().enumerate() {
		let index = offset + 1;
		if change.from_status != Some(status) {
			return Err(HistoryError::BrokenLink {
				index,
				expected: status,
			});
		}
		validate(status, change.to_status, change.role)
			.map_err(|source| HistoryError::IllegalStep { index, source })?;
		status = change.to_status;
	}

	Ok(status)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;
	use std::collections::HashSet;

	const TABLE: [(OrderStatus, OrderStatus, &[Role]); 8] = [
		(OrderStatus::Placed, OrderStatus::Confirmed, &[Role::Restaurant]),
		(OrderStatus::Placed, OrderStatus::Cancelled, &[Role::Customer]),
		(OrderStatus::Confirmed, OrderStatus::Preparing, &[Role::Restaurant]),
		(
			OrderStatus::Confirmed,
			OrderStatus::Cancelled,
			&[Role::Customer, Role::Restaurant],
		),
		(OrderStatus::Preparing, OrderStatus::ReadyForPickup, &[Role::Restaurant]),
		(OrderStatus::ReadyForPickup, OrderStatus::PickedUp, &[Role::Driver]),
		(OrderStatus::PickedUp, OrderStatus::OutForDelivery, &[Role::Driver]),
		(OrderStatus::OutForDelivery, OrderStatus::Delivered, &[Role::Driver]),
	];

	fn expected_rule(from: OrderStatus, to: OrderStatus) -> Option<&'static [Role]> {
		TABLE
			.iter()
			.find(|(f, t, _)| *f == from && *t == to)
			.map(|(_, _, roles)| *roles)
	}

	#[test]
	fn test_table_content() {
		let actual: Vec<_> = all_rules().map(|r| (r.from, r.to, r.roles)).collect();
		assert_eq!(actual, TABLE.to_vec());
	}

	#[test]
	fn test_terminality_is_structural() {
		for status in OrderStatus::all() {
			let terminal = matches!(status, OrderStatus::Delivered | OrderStatus::Cancelled);
			assert_eq!(is_terminal(status), terminal, "{status}");
			if !terminal {
				assert!(!rules_from(status).unwrap().is_empty());
			}
		}
		for rule in all_rules() {
			assert!(!rule.roles.is_empty());
			assert_eq!(rules_from(rule.from).unwrap().iter().filter(|r| r.to == rule.to).count(), 1);
		}
	}

	#[test]
	fn test_graph_is_acyclic_and_ends_in_terminals() {
		fn visit(status: OrderStatus, path: &mut Vec<OrderStatus>, sinks: &mut HashSet<OrderStatus>) {
			assert!(!path.contains(&status), "cycle through {status}");
			match rules_from(status) {
				None => {
					sinks.insert(status);
				},
				Some(rules) => {
					path.push(status);
					for rule in rules {
						visit(rule.to, path, sinks);
					}
					path.pop();
				},
			}
		}

		let mut sinks = HashSet::new();
		visit(OrderStatus::Placed, &mut Vec::new(), &mut sinks);
		assert_eq!(
			sinks,
			HashSet::from([OrderStatus::Delivered, OrderStatus::Cancelled])
		);
	}

	#[test]
	fn test_validate_over_every_combination() {
		for from in OrderStatus::all() {
			for to in OrderStatus::all() {
				for role in Role::all() {
					let result = validate(from, to, role);
					match (is_terminal(from), expected_rule(from, to)) {
						(true, _) => assert_eq!(result, Err(TransitionRejection::Terminal { from })),
						(false, None) => {
							let err = result.unwrap_err();
							assert_eq!(err.kind(), RejectionKind::IllegalTransition);
							assert_eq!(
								err,
								TransitionRejection::IllegalTransition {
									from,
									to,
									allowed: allowed_targets(from, None),
								}
							);
						},
						(false, Some(roles)) if roles.contains(&role) => {
							let rule = result.unwrap();
							assert_eq!((rule.from, rule.to), (from, to));
						},
						(false, Some(_)) => {
							assert_eq!(result, Err(TransitionRejection::Unauthorized { from, to, role }))
						},
					}
				}
			}
		}
	}

	#[test]
	fn test_validate_and_query_are_idempotent() {
		for from in OrderStatus::all() {
			for to in OrderStatus::all() {
				for role in Role::all() {
					assert_eq!(validate(from, to, role), validate(from, to, role));
				}
			}
			for role in Role::all().map(Some).chain([None]) {
				assert_eq!(allowed_targets(from, role), allowed_targets(from, role));
			}
		}
	}

	#[test]
	fn test_customer_cannot_confirm() {
		let err = validate(OrderStatus::Placed, OrderStatus::Confirmed, Role::Customer).unwrap_err();
		assert_eq!(err.kind(), RejectionKind::Unauthorized);
		assert_eq!(
			err.to_string(),
			"role 'customer' is not authorized to transition order from 'PLACED' to 'CONFIRMED'"
		);
	}

	#[test]
	fn test_skipping_ahead_lists_legal_targets() {
		let err =
			validate(OrderStatus::Placed, OrderStatus::Delivered, Role::Restaurant).unwrap_err();
		assert_eq!(
			err,
			TransitionRejection::IllegalTransition {
				from: OrderStatus::Placed,
				to: OrderStatus::Delivered,
				allowed: vec![OrderStatus::Confirmed, OrderStatus::Cancelled],
			}
		);
		assert_eq!(
			err.to_string(),
			"invalid transition from 'PLACED' to 'DELIVERED'; valid transitions: [CONFIRMED CANCELLED]"
		);
	}

	#[test]
	fn test_delivered_rejects_everything() {
		for to in OrderStatus::all() {
			for role in Role::all() {
				let err = validate(OrderStatus::Delivered, to, role).unwrap_err();
				assert_eq!(err.kind(), RejectionKind::Terminal);
				assert_eq!(
					err.to_string(),
					"no transitions allowed from status 'DELIVERED' (terminal state)"
				);
			}
		}
	}

	#[test]
	fn test_customer_cancels_confirmed_order() {
		let rule = validate(OrderStatus::Confirmed, OrderStatus::Cancelled, Role::Customer).unwrap();
		assert_eq!(rule.roles, &[Role::Customer, Role::Restaurant]);
	}

	#[test]
	fn test_cancellation_closes_after_confirmation() {
		for from in [
			OrderStatus::Preparing,
			OrderStatus::ReadyForPickup,
			OrderStatus::PickedUp,
			OrderStatus::OutForDelivery,
		] {
			for role in Role::all() {
				assert_eq!(
					validate(from, OrderStatus::Cancelled, role).unwrap_err().kind(),
					RejectionKind::IllegalTransition
				);
			}
		}
	}

	#[test]
	fn test_allowed_targets() {
		assert_eq!(
			allowed_targets(OrderStatus::Confirmed, None),
			vec![OrderStatus::Preparing, OrderStatus::Cancelled]
		);
		assert_eq!(
			allowed_targets(OrderStatus::Confirmed, Some(Role::Customer)),
			vec![OrderStatus::Cancelled]
		);
		assert!(allowed_targets(OrderStatus::Confirmed, Some(Role::Driver)).is_empty());
		assert!(allowed_targets(OrderStatus::Cancelled, None).is_empty());
		assert!(allowed_targets(OrderStatus::Delivered, Some(Role::Driver)).is_empty());
	}

	fn change(from: Option<OrderStatus>, to: OrderStatus, role: Role) -> StatusChange {
		StatusChange {
			from_status: from,
			to_status: to,
			changed_by: format!("{role}-1"),
			role,
			timestamp: Utc::now(),
		}
	}

	fn happy_path() -> Vec<StatusChange> {
		vec![
			change(None, OrderStatus::Placed, Role::Customer),
			change(Some(OrderStatus::Placed), OrderStatus::Confirmed, Role::Restaurant),
			change(Some(OrderStatus::Confirmed), OrderStatus::Preparing, Role::Restaurant),
			change(
				Some(OrderStatus::Preparing),
				OrderStatus::ReadyForPickup,
				Role::Restaurant,
			),
			change(Some(OrderStatus::ReadyForPickup), OrderStatus::PickedUp, Role::Driver),
			change(Some(OrderStatus::PickedUp), OrderStatus::OutForDelivery, Role::Driver),
			change(Some(OrderStatus::OutForDelivery), OrderStatus::Delivered, Role::Driver),
		]
	}

	#[test]
	fn test_replay_happy_path() {
		assert_eq!(replay_history(&happy_path()), Ok(OrderStatus::Delivered));
		assert_eq!(replay_history(&happy_path()[..3]), Ok(OrderStatus::Preparing));
	}

	#[test]
	fn test_replay_rejects_malformed_histories() {
		assert_eq!(replay_history(&[]), Err(HistoryError::Empty));

		let mut history = happy_path();
		history[0].role = Role::Driver;
		assert_eq!(replay_history(&history), Err(HistoryError::InvalidCreation));

		let mut history = happy_path();
		history.remove(2);
		assert_eq!(
			replay_history(&history),
			Err(HistoryError::BrokenLink {
				index: 2,
				expected: OrderStatus::Confirmed
			})
		);

		let mut history = happy_path();
		history[1].role = Role::Customer;
		assert!(matches!(
			replay_history(&history),
			Err(HistoryError::IllegalStep {
				index: 1,
				source: TransitionRejection::Unauthorized { .. }
			})
		));
	}
}
