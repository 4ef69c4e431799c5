// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::VariableDeclarationNode;
use relcore_type::{Result, Value};

use crate::{Context, Outcome, stack::Symbol};

impl Context {
	/// Pushes a new variable, initialized from its initializer, else from the
	/// default of its domain, else nil.
	pub(super) fn execute_declaration(&mut self, node: &VariableDeclarationNode) -> Result<Outcome> {
		let value = match (&node.initializer, node.domain.as_ref().and_then(|d| d.effective_default())) {
			(Some(initializer), _) => self.evaluate(initializer)?,
			(None, Some(default)) => self.evaluate(default)?,
			(None, None) => Value::Nil,
		};
		let value = self.validate_value(&node.ty, node.domain.as_deref(), value)?;
		self.push(Symbol::new(node.name.clone(), node.ty.clone(), value).with_domain(node.domain.clone()))?;
		Ok(Outcome::Normal)
	}
}
