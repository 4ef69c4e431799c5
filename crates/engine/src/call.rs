// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::{CallNode, CallTarget, Modifier, Operator, OperatorBody, PlanNode};
use relcore_type::{
	Result, Value,
	error::diagnostic::{
		internal::{missing_node_shape, unmatched_signal},
		runtime::call_depth_exceeded,
		security::unauthorized,
	},
	return_error,
};
use tracing::{instrument, warn};

use crate::{
	Context, Outcome,
	scope::{GlobalContextScope, InsertModeScope, SecurityScope, WindowScope},
	stack::Symbol,
};

impl Context {
	/// Evaluates a call node: binds the arguments, invokes the operator and
	/// writes var and out operands back into the caller's variables.
	pub(crate) fn call(&mut self, node: &CallNode) -> Result<Value> {
		let operator = match &node.target {
			CallTarget::Operator(operator) => operator.clone(),
			CallTarget::Named(name) => self.catalog().operator(name)?,
		};
		if node.arguments.len() != operator.operands.len() {
			return_error!(missing_node_shape(&format!(
				"{} arguments for operator '{}' taking {}",
				node.arguments.len(),
				operator.name,
				operator.operands.len()
			)));
		}

		let mut arguments = Vec::with_capacity(node.arguments.len());
		let mut references = Vec::with_capacity(node.arguments.len());
		for (argument, operand) in node.arguments.iter().zip(&operator.operands) {
			let reference = match (operand.modifier, argument) {
				(Modifier::Const, PlanNode::Variable(name)) => self.stack.find(name),
				_ => None,
			};
			match (reference, operand.modifier) {
				(Some(offset), _) => {
					references.push(Some(self.stack.index_of(offset)?));
					arguments.push(Value::Nil);
				}
				(None, Modifier::Out) => {
					references.push(None);
					arguments.push(Value::Nil);
				}
				(None, _) => {
					references.push(None);
					arguments.push(self.evaluate(argument)?);
				}
			}
		}

		let result = self.invoke(&operator, &mut arguments, &references)?;

		for ((argument, operand), value) in node.arguments.iter().zip(&operator.operands).zip(arguments) {
			if let (true, PlanNode::Variable(name)) = (operand.modifier.is_written_back(), argument) {
				self.assign(name, value)?;
			}
		}
		Ok(result)
	}

	/// Invokes `operator` with `arguments`. On return, the entries for var and
	/// out operands hold their final values. `references` optionally binds an
	/// operand to an existing stack slot instead of its argument value.
	#[instrument(name = "engine::call::invoke", level = "trace", skip_all, fields(operator = %operator.name))]
	pub(crate) fn invoke(
		&mut self,
		operator: &Arc<Operator>,
		arguments: &mut [Value],
		references: &[Option<usize>],
	) -> Result<Value> {
		self.check_aborted()?;
		let max_call_depth = self.config().max_call_depth;
		if self.call_depth >= max_call_depth {
			return_error!(call_depth_exceeded(max_call_depth));
		}
		if arguments.len() != operator.operands.len() {
			return_error!(missing_node_shape(&format!(
				"{} arguments for operator '{}' taking {}",
				arguments.len(),
				operator.name,
				operator.operands.len()
			)));
		}
		self.authorize(operator)?;
		let owner = self.catalog().user(&operator.owner)?;
		let app = if operator.is_app_transaction_specialized {
			None
		} else {
			self.app.clone()
		};

		let mut symbols = Vec::with_capacity(operator.operands.len());
		for (i, operand) in operator.operands.iter().enumerate() {
			let symbol = match references.get(i).copied().flatten() {
				Some(target) => Symbol::reference(operand.name.clone(), operand.ty.clone(), target),
				None => {
					let value = match operand.modifier {
						Modifier::Out => Value::Nil,
						_ => Context::conform(&operand.ty, arguments[i].clone())?,
					};
					let symbol = Symbol::new(operand.name.clone(), operand.ty.clone(), value);
					if operand.modifier == Modifier::Const {
						symbol.constant()
					} else {
						symbol
					}
				}
			};
			symbols.push(symbol);
		}
		let operand_count = symbols.len();

		let mut window = WindowScope::open(self, symbols)?;
		let mut security = SecurityScope::switch(&mut window, owner);
		let mut insert_mode = InsertModeScope::set(&mut security, false);
		let mut global = GlobalContextScope::enter(&mut insert_mode, app.as_ref());

		if let Some(ty) = &operator.return_type {
			global.push(Symbol::new("Result", ty.clone(), Value::Nil))?;
		}
		let depth = global.stack.len();
		let base = depth - operator.return_type.is_some() as usize - operand_count;

		global.execute_body(operator, base)?;

		let top = global.stack.len() - 1;
		for (i, operand) in operator.operands.iter().enumerate() {
			if operand.modifier.is_written_back() {
				arguments[i] = global.stack.peek_value(top - (base + i))?;
			}
		}
		match &operator.return_type {
			Some(ty) => Context::conform(ty, global.stack.peek_value(top - (depth - 1))?),
			None => Ok(Value::Nil),
		}
	}

	fn execute_body(&mut self, operator: &Operator, base: usize) -> Result<()> {
		match &operator.body {
			OperatorBody::Plan(body) => match self.execute(body)? {
				Outcome::Normal | Outcome::Exit => Ok(()),
				signal => return_error!(unmatched_signal(&signal.to_string())),
			},
			OperatorBody::Native(native) => {
				let top = self.stack.len() - 1;
				let mut values = Vec::with_capacity(operator.operands.len());
				for i in 0..operator.operands.len() {
					values.push(self.stack.peek_value(top - (base + i))?);
				}
				let result = native.invoke(&mut values)?;
				for (i, (operand, value)) in operator.operands.iter().zip(values).enumerate() {
					if operand.modifier.is_written_back() {
						self.stack.poke(top - (base + i), value)?;
					}
				}
				if operator.return_type.is_some() {
					self.stack.poke(0, result)?;
				}
				Ok(())
			}
		}
	}

	/// Owners and holders of the operator's execute right may call it.
	fn authorize(&self, operator: &Operator) -> Result<()> {
		let Some(right) = &operator.execute_right else {
			return Ok(());
		};
		if self.user.name == operator.owner || self.user.has_right(right) {
			return Ok(());
		}
		warn!(user = %self.user.name, operator = %operator.name, right = %right, "call refused");
		return_error!(unauthorized(&self.user.name, right))
	}
}
