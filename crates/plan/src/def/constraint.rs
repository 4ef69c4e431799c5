// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use crate::node::PlanNode;

/// A boolean expression that must not evaluate to false.
///
/// What the expression sees depends on where the constraint is attached:
/// row constraints see the row as `value`, transition constraints see `old`
/// and/or `new`, column and scalar type constraints see the scalar as
/// `value`, catalog constraints see nothing but the catalog.
#[derive(Debug, Clone)]
pub struct Constraint {
	pub name: String,
	pub expression: Arc<PlanNode>,
	/// Replaces the generated violation message.
	pub message: Option<String>,
	/// Checked at commit of the enclosing transaction instead of inline.
	pub is_deferred: bool,
}

impl Constraint {
	pub fn new(name: impl Into<String>, expression: PlanNode) -> Self {
		Self {
			name: name.into(),
			expression: Arc::new(expression),
			message: None,
			is_deferred: false,
		}
	}

	pub fn deferred(mut self) -> Self {
		self.is_deferred = true;
		self
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}
