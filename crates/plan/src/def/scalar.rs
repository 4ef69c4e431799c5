// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_type::Type;

use super::{
	constraint::Constraint,
	event::{EventHandler, EventHandlers},
};
use crate::node::PlanNode;

/// A catalog-defined scalar type over a native representation. Types may
/// derive from a parent, inheriting its constraints, default and handlers.
#[derive(Debug)]
pub struct ScalarType {
	pub name: String,
	pub native: Type,
	pub parent: Option<Arc<ScalarType>>,
	pub constraints: Vec<Constraint>,
	pub default: Option<Arc<PlanNode>>,
	pub handlers: EventHandlers,
}

impl ScalarType {
	pub fn new(name: impl Into<String>, native: Type) -> Self {
		Self {
			name: name.into(),
			native,
			parent: None,
			constraints: Vec::new(),
			default: None,
			handlers: EventHandlers::default(),
		}
	}

	pub fn with_parent(mut self, parent: Arc<ScalarType>) -> Self {
		self.parent = Some(parent);
		self
	}

	pub fn with_constraint(mut self, constraint: Constraint) -> Self {
		self.constraints.push(constraint);
		self
	}

	pub fn with_default(mut self, default: PlanNode) -> Self {
		self.default = Some(Arc::new(default));
		self
	}

	pub fn with_handler(mut self, handler: EventHandler) -> Self {
		self.handlers.add(handler);
		self
	}

	/// This type followed by its ancestors, most derived first.
	pub fn ancestry(&self) -> Ancestry<'_> {
		Ancestry {
			current: Some(self),
		}
	}

	/// The nearest default in the ancestry.
	pub fn effective_default(&self) -> Option<&Arc<PlanNode>> {
		self.ancestry().find_map(|t| t.default.as_ref())
	}
}

pub struct Ancestry<'a> {
	current: Option<&'a ScalarType>,
}

impl<'a> Iterator for Ancestry<'a> {
	type Item = &'a ScalarType;

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.current?;
		self.current = current.parent.as_deref();
		Some(current)
	}
}
