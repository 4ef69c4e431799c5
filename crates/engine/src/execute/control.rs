// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::{CaseNode, ForEachNode, IfNode, PlanNode, SelectedCaseNode};
use relcore_type::{Result, Type, Value, error::diagnostic::runtime::type_mismatch, return_error};

use crate::{Context, Outcome, scope::FrameScope, stack::Symbol};

/// What a loop does after one execution of its body.
enum Step {
	Next,
	Leave(Outcome),
}

fn step(outcome: Outcome) -> Step {
	match outcome {
		Outcome::Normal | Outcome::Continue => Step::Next,
		Outcome::Break => Step::Leave(Outcome::Normal),
		Outcome::Exit => Step::Leave(Outcome::Exit),
	}
}

impl Context {
	pub(super) fn execute_if(&mut self, node: &IfNode) -> Result<Outcome> {
		if self.condition(&node.condition)? {
			self.execute(&node.then)
		} else if let Some(otherwise) = &node.otherwise {
			self.execute(otherwise)
		} else {
			Ok(Outcome::Normal)
		}
	}

	pub(super) fn execute_case(&mut self, node: &CaseNode) -> Result<Outcome> {
		for item in &node.items {
			if self.condition(&item.when)? {
				return self.execute(&item.then);
			}
		}
		match &node.otherwise {
			Some(otherwise) => self.execute(otherwise),
			None => Ok(Outcome::Normal),
		}
	}

	pub(super) fn execute_selected_case(&mut self, node: &SelectedCaseNode) -> Result<Outcome> {
		let selector = self.evaluate(&node.selector)?;
		for item in &node.items {
			let when = self.evaluate(&item.when)?;
			let matched = match &node.comparer {
				Some(comparer) => {
					let mut frame = FrameScope::push(self);
					frame.push(Symbol::new("selector", Type::Any, selector.clone()))?;
					frame.push(Symbol::new("when", Type::Any, when))?;
					frame.condition(comparer)?
				}
				None => selector.equals(&when) == Some(true),
			};
			if matched {
				return self.execute(&item.then);
			}
		}
		match &node.otherwise {
			Some(otherwise) => self.execute(otherwise),
			None => Ok(Outcome::Normal),
		}
	}

	pub(super) fn execute_while(&mut self, condition: &PlanNode, body: &PlanNode) -> Result<Outcome> {
		loop {
			self.check_aborted()?;
			if !self.condition(condition)? {
				return Ok(Outcome::Normal);
			}
			if let Step::Leave(outcome) = step(self.execute(body)?) {
				return Ok(outcome);
			}
		}
	}

	pub(super) fn execute_do_while(&mut self, body: &PlanNode, condition: &PlanNode) -> Result<Outcome> {
		loop {
			self.check_aborted()?;
			if let Step::Leave(outcome) = step(self.execute(body)?) {
				return Ok(outcome);
			}
			if !self.condition(condition)? {
				return Ok(Outcome::Normal);
			}
		}
	}

	/// Iterates the rows of a table or the items of a list. Each iteration
	/// runs in its own frame, so the loop variable and anything the body
	/// declares are released however the iteration ends.
	pub(super) fn execute_for_each(&mut self, node: &ForEachNode) -> Result<Outcome> {
		let items = match self.evaluate(&node.source)? {
			Value::Table(rows) => rows.into_iter().map(Value::row).collect(),
			Value::List(items) => items,
			Value::Nil => Vec::new(),
			other => return_error!(type_mismatch("Table or List", other.kind())),
		};

		for item in items {
			self.check_aborted()?;
			let mut iteration = FrameScope::push(self);
			match &node.variable {
				Some(name) if node.is_allocation => iteration.push(Symbol::new(name.clone(), Type::Any, item))?,
				Some(name) => iteration.assign(name, item)?,
				None => iteration.push(Symbol::anonymous(item))?,
			}
			if let Step::Leave(outcome) = step(iteration.execute(&node.body)?) {
				return Ok(outcome);
			}
		}
		Ok(Outcome::Normal)
	}
}
