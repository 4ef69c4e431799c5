// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use relcore_plan::{Constraint, EventHandler, TableVar};
use relcore_type::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
	Insert,
	Update,
	Delete,
}

impl Display for Transition {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Transition::Insert => f.write_str("insert"),
			Transition::Update => f.write_str("update"),
			Transition::Delete => f.write_str("delete"),
		}
	}
}

/// A constraint check postponed to commit, with the rows it must see.
#[derive(Debug, Clone)]
pub enum DeferredCheck {
	Row {
		table: Arc<TableVar>,
		constraint: Constraint,
		row: Row,
	},
	Transition {
		table: Arc<TableVar>,
		constraint: Constraint,
		transition: Transition,
		old: Option<Row>,
		new: Option<Row>,
	},
	Catalog {
		constraint: Constraint,
	},
}

impl DeferredCheck {
	pub fn constraint(&self) -> &Constraint {
		match self {
			DeferredCheck::Row {
				constraint,
				..
			}
			| DeferredCheck::Transition {
				constraint,
				..
			}
			| DeferredCheck::Catalog {
				constraint,
			} => constraint,
		}
	}

	fn is_same_catalog_check(&self, other: &DeferredCheck) -> bool {
		match (self, other) {
			(
				DeferredCheck::Catalog {
					constraint: l,
				},
				DeferredCheck::Catalog {
					constraint: r,
				},
			) => l.name == r.name,
			_ => false,
		}
	}
}

/// An after handler postponed to commit.
#[derive(Debug, Clone)]
pub struct DeferredHandler {
	pub table: Arc<TableVar>,
	pub handler: EventHandler,
	pub old: Option<Row>,
	pub new: Option<Row>,
}

/// Catalog constraints do not depend on the mutated row, so one pending
/// check per constraint suffices.
pub(crate) fn push_check(checks: &mut Vec<DeferredCheck>, check: DeferredCheck) {
	if checks.iter().any(|c| c.is_same_catalog_check(&check)) {
		return;
	}
	checks.push(check);
}
