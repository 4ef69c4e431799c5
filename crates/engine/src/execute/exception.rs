// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::{PlanNode, TryExceptNode};
use relcore_type::{
	Result, Type, Value,
	error::diagnostic::runtime::{nil_error_expected, type_mismatch},
	return_error,
};
use tracing::{debug, trace};

use crate::{
	Context, Outcome,
	scope::{ErrorScope, FrameScope},
	stack::Symbol,
};

impl Context {
	/// Raises the given error value, or re-raises the error being handled.
	pub(super) fn execute_raise(&mut self, error: Option<&PlanNode>) -> Result<Outcome> {
		let error = match error {
			Some(node) => match self.evaluate(node)? {
				Value::Error(error) => *error,
				Value::Nil => return_error!(nil_error_expected()),
				other => return_error!(type_mismatch("Error", other.kind())),
			},
			None => match self.errors.last() {
				Some(error) => error.clone(),
				None => return_error!(nil_error_expected()),
			},
		};
		debug!(code = error.code(), class = %error.class(), "raise");
		Err(error)
	}

	pub(super) fn execute_try_finally(&mut self, body: &PlanNode, finally: &PlanNode) -> Result<Outcome> {
		let result = self.execute(body);
		match self.execute(finally)? {
			Outcome::Normal => result,
			signal => Ok(signal),
		}
	}

	/// Runs the first handler whose class is the error's class or one of its
	/// ancestors. Internal errors pass through every handler.
	pub(super) fn execute_try_except(&mut self, node: &TryExceptNode) -> Result<Outcome> {
		let error = match self.execute(&node.body) {
			Ok(outcome) => return Ok(outcome),
			Err(error) => error,
		};
		if !error.class().is_catchable() {
			return Err(error);
		}
		let class = error.class();
		let Some(handler) = node.handlers.iter().find(|h| h.class.is_none_or(|c| class.is_a(c))) else {
			return Err(error);
		};
		trace!(code = error.code(), %class, "exception handled");

		let mut handling = ErrorScope::push(self, error.clone());
		let mut frame = FrameScope::push(&mut handling);
		if let Some(variable) = &handler.variable {
			frame.push(Symbol::new(variable.clone(), Type::Error, Value::error(error)))?;
		}
		frame.execute(&handler.body)
	}
}
