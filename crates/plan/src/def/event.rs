// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	slice::Iter,
	sync::Arc,
};

use super::operator::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	BeforeInsert,
	AfterInsert,
	BeforeUpdate,
	AfterUpdate,
	BeforeDelete,
	AfterDelete,
	Validate,
	Default,
	Change,
}

impl EventKind {
	pub fn is_before(&self) -> bool {
		matches!(self, EventKind::BeforeInsert | EventKind::BeforeUpdate | EventKind::BeforeDelete)
	}
}

impl Display for EventKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			EventKind::BeforeInsert => "BeforeInsert",
			EventKind::AfterInsert => "AfterInsert",
			EventKind::BeforeUpdate => "BeforeUpdate",
			EventKind::AfterUpdate => "AfterUpdate",
			EventKind::BeforeDelete => "BeforeDelete",
			EventKind::AfterDelete => "AfterDelete",
			EventKind::Validate => "Validate",
			EventKind::Default => "Default",
			EventKind::Change => "Change",
		};
		f.write_str(name)
	}
}

/// An operator attached to a table, column or scalar type event.
///
/// Before handlers receive the proposed row as a `var` operand and may veto
/// by returning false. Validate, Default and Change handlers return whether
/// they altered the row (or scalar).
#[derive(Debug, Clone)]
pub struct EventHandler {
	pub name: String,
	pub kind: EventKind,
	pub operator: Arc<Operator>,
	/// Invoked at commit of the enclosing transaction instead of inline.
	/// Only meaningful for after handlers.
	pub is_deferred: bool,
}

impl EventHandler {
	pub fn new(name: impl Into<String>, kind: EventKind, operator: Arc<Operator>) -> Self {
		Self {
			name: name.into(),
			kind,
			operator,
			is_deferred: false,
		}
	}

	pub fn deferred(mut self) -> Self {
		self.is_deferred = true;
		self
	}
}

/// Ordered handlers for one event, invoked in registration order.
#[derive(Debug, Clone, Default)]
pub struct HandlerChain {
	handlers: Vec<EventHandler>,
}

impl HandlerChain {
	pub fn new() -> Self {
		Self {
			handlers: Vec::new(),
		}
	}

	pub fn add(&mut self, handler: EventHandler) {
		self.handlers.push(handler);
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn iter(&self) -> Iter<'_, EventHandler> {
		self.handlers.iter()
	}
}

impl<'a> IntoIterator for &'a HandlerChain {
	type Item = &'a EventHandler;
	type IntoIter = Iter<'a, EventHandler>;

	fn into_iter(self) -> Self::IntoIter {
		self.handlers.iter()
	}
}

#[derive(Debug, Clone, Default)]
pub struct EventHandlers {
	pub before_insert: HandlerChain,
	pub after_insert: HandlerChain,
	pub before_update: HandlerChain,
	pub after_update: HandlerChain,
	pub before_delete: HandlerChain,
	pub after_delete: HandlerChain,
	pub validate: HandlerChain,
	pub default: HandlerChain,
	pub change: HandlerChain,
}

impl EventHandlers {
	pub fn get(&self, kind: EventKind) -> &HandlerChain {
		match kind {
			EventKind::BeforeInsert => &self.before_insert,
			EventKind::AfterInsert => &self.after_insert,
			EventKind::BeforeUpdate => &self.before_update,
			EventKind::AfterUpdate => &self.after_update,
			EventKind::BeforeDelete => &self.before_delete,
			EventKind::AfterDelete => &self.after_delete,
			EventKind::Validate => &self.validate,
			EventKind::Default => &self.default,
			EventKind::Change => &self.change,
		}
	}

	fn get_mut(&mut self, kind: EventKind) -> &mut HandlerChain {
		match kind {
			EventKind::BeforeInsert => &mut self.before_insert,
			EventKind::AfterInsert => &mut self.after_insert,
			EventKind::BeforeUpdate => &mut self.before_update,
			EventKind::AfterUpdate => &mut self.after_update,
			EventKind::BeforeDelete => &mut self.before_delete,
			EventKind::AfterDelete => &mut self.after_delete,
			EventKind::Validate => &mut self.validate,
			EventKind::Default => &mut self.default,
			EventKind::Change => &mut self.change,
		}
	}

	/// Routes `handler` to the chain of its event kind.
	pub fn add(&mut self, handler: EventHandler) {
		self.get_mut(handler.kind).add(handler);
	}

	pub fn has(&self, kind: EventKind) -> bool {
		!self.get(kind).is_empty()
	}
}
