// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::PlanNode;
use relcore_type::{Result, error::diagnostic::internal::missing_node_shape, return_error};

use crate::{Context, Outcome, evaluate::describe, scope::FrameScope};

mod control;
mod exception;
mod variable;

impl Context {
	/// Executes a statement node.
	pub(crate) fn execute(&mut self, node: &PlanNode) -> Result<Outcome> {
		match node {
			PlanNode::Block(statements) => self.execute_block(statements),
			PlanNode::DelimitedBlock(statements) => {
				let mut frame = FrameScope::push(self);
				frame.execute_block(statements)
			}
			PlanNode::Frame(child) => {
				let mut frame = FrameScope::push(self);
				frame.execute(child)
			}
			PlanNode::ExpressionStatement(expression) => {
				self.evaluate(expression)?;
				Ok(Outcome::Normal)
			}
			PlanNode::If(node) => self.execute_if(node),
			PlanNode::Case(node) => self.execute_case(node),
			PlanNode::SelectedCase(node) => self.execute_selected_case(node),
			PlanNode::While {
				condition,
				body,
			} => self.execute_while(condition, body),
			PlanNode::DoWhile {
				body,
				condition,
			} => self.execute_do_while(body, condition),
			PlanNode::ForEach(node) => self.execute_for_each(node),
			PlanNode::Break => Ok(Outcome::Break),
			PlanNode::Continue => Ok(Outcome::Continue),
			PlanNode::Exit => Ok(Outcome::Exit),
			PlanNode::Raise(error) => self.execute_raise(error.as_deref()),
			PlanNode::TryFinally {
				body,
				finally,
			} => self.execute_try_finally(body, finally),
			PlanNode::TryExcept(node) => self.execute_try_except(node),
			PlanNode::Assignment {
				target,
				value,
			} => {
				let value = self.evaluate(value)?;
				self.assign(target, value)?;
				Ok(Outcome::Normal)
			}
			PlanNode::VariableDeclaration(node) => self.execute_declaration(node),
			PlanNode::Insert(node) => self.execute_insert(node),
			PlanNode::Update(node) => self.execute_update(node),
			PlanNode::Delete(node) => self.execute_delete(node),
			expression => return_error!(missing_node_shape(&format!("a statement, found {}", describe(expression)))),
		}
	}

	fn execute_block(&mut self, statements: &[PlanNode]) -> Result<Outcome> {
		for statement in statements {
			match self.execute(statement)? {
				Outcome::Normal => {}
				signal => return Ok(signal),
			}
		}
		Ok(Outcome::Normal)
	}
}
