// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	sync::Arc,
};

use relcore_type::{Result, Type, Value, error::diagnostic::catalog::invalid_characteristics, return_error};

use crate::node::{Characteristics, PlanNode};

/// How an argument is passed to an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
	/// By value.
	In,
	/// By value, with the final value copied back to the caller.
	Var,
	/// Like `Var`, but the incoming value is ignored.
	Out,
	/// By reference when the argument is a variable; not assignable.
	Const,
}

impl Modifier {
	pub fn is_written_back(&self) -> bool {
		matches!(self, Modifier::Var | Modifier::Out)
	}
}

#[derive(Debug, Clone)]
pub struct Operand {
	pub name: String,
	pub ty: Type,
	pub modifier: Modifier,
}

/// Host implementation of an operator body. Receives the operand values in
/// declaration order; `var`/`out` operands are written back after the call.
#[derive(Clone)]
pub struct NativeOperator(pub Arc<dyn Fn(&mut [Value]) -> Result<Value> + Send + Sync>);

impl NativeOperator {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&mut [Value]) -> Result<Value> + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn invoke(&self, arguments: &mut [Value]) -> Result<Value> {
		(self.0)(arguments)
	}
}

impl Debug for NativeOperator {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("NativeOperator")
	}
}

#[derive(Debug, Clone)]
pub enum OperatorBody {
	Plan(Arc<PlanNode>),
	Native(NativeOperator),
}

#[derive(Debug)]
pub struct Operator {
	pub name: String,
	/// The body runs under the security context of this user.
	pub owner: String,
	pub operands: Vec<Operand>,
	pub return_type: Option<Type>,
	pub body: OperatorBody,
	/// Right a caller must hold; `None` means anyone may execute.
	pub execute_right: Option<String>,
	/// Already compiled against an application transaction, so the call must
	/// not push the transaction's global context again.
	pub is_app_transaction_specialized: bool,
	/// Declared characteristics.
	pub characteristics: Characteristics,
}

impl Operator {
	pub fn builder(name: impl Into<String>) -> OperatorBuilder {
		OperatorBuilder::new(name)
	}

	pub fn operand_index(&self, name: &str) -> Option<usize> {
		self.operands.iter().position(|o| o.name == name)
	}

	/// Refuses declared characteristics the body cannot honor.
	pub fn validate_characteristics(&self) -> Result<()> {
		let actual = match &self.body {
			OperatorBody::Plan(body) => body.characteristics(),
			OperatorBody::Native(_) => return Ok(()),
		};
		let declared = &self.characteristics;
		if declared.is_functional && !actual.is_functional {
			return_error!(invalid_characteristics(&self.name, "functional"));
		}
		if declared.is_deterministic && !actual.is_deterministic {
			return_error!(invalid_characteristics(&self.name, "deterministic"));
		}
		if declared.is_repeatable && !actual.is_repeatable {
			return_error!(invalid_characteristics(&self.name, "repeatable"));
		}
		Ok(())
	}
}

pub struct OperatorBuilder {
	name: String,
	owner: String,
	operands: Vec<Operand>,
	return_type: Option<Type>,
	body: Option<OperatorBody>,
	execute_right: Option<String>,
	is_app_transaction_specialized: bool,
	characteristics: Option<Characteristics>,
}

impl OperatorBuilder {
	fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			owner: "System".to_string(),
			operands: Vec::new(),
			return_type: None,
			body: None,
			execute_right: None,
			is_app_transaction_specialized: false,
			characteristics: None,
		}
	}

	pub fn owner(mut self, owner: impl Into<String>) -> Self {
		self.owner = owner.into();
		self
	}

	pub fn operand(self, name: impl Into<String>, ty: Type) -> Self {
		self.operand_with(name, ty, Modifier::In)
	}

	pub fn var_operand(self, name: impl Into<String>, ty: Type) -> Self {
		self.operand_with(name, ty, Modifier::Var)
	}

	pub fn out_operand(self, name: impl Into<String>, ty: Type) -> Self {
		self.operand_with(name, ty, Modifier::Out)
	}

	pub fn const_operand(self, name: impl Into<String>, ty: Type) -> Self {
		self.operand_with(name, ty, Modifier::Const)
	}

	pub fn operand_with(mut self, name: impl Into<String>, ty: Type, modifier: Modifier) -> Self {
		self.operands.push(Operand {
			name: name.into(),
			ty,
			modifier,
		});
		self
	}

	pub fn returns(mut self, ty: Type) -> Self {
		self.return_type = Some(ty);
		self
	}

	pub fn body(mut self, body: PlanNode) -> Self {
		self.body = Some(OperatorBody::Plan(Arc::new(body)));
		self
	}

	pub fn native<F>(mut self, f: F) -> Self
	where
		F: Fn(&mut [Value]) -> Result<Value> + Send + Sync + 'static,
	{
		self.body = Some(OperatorBody::Native(NativeOperator::new(f)));
		self
	}

	pub fn execute_right(mut self, right: impl Into<String>) -> Self {
		self.execute_right = Some(right.into());
		self
	}

	pub fn app_transaction_specialized(mut self) -> Self {
		self.is_app_transaction_specialized = true;
		self
	}

	/// Overrides the characteristics otherwise derived from the body.
	pub fn characteristics(mut self, characteristics: Characteristics) -> Self {
		self.characteristics = Some(characteristics);
		self
	}

	pub fn build(self) -> Operator {
		let body = self.body.unwrap_or_else(|| OperatorBody::Plan(Arc::new(PlanNode::Block(vec![]))));
		let characteristics = self.characteristics.unwrap_or_else(|| match &body {
			OperatorBody::Plan(plan) => Characteristics {
				is_literal: false,
				..plan.characteristics()
			},
			OperatorBody::Native(_) => Characteristics::default(),
		});
		Operator {
			name: self.name,
			owner: self.owner,
			operands: self.operands,
			return_type: self.return_type,
			body,
			execute_right: self.execute_right,
			is_app_transaction_specialized: self.is_app_transaction_specialized,
			characteristics,
		}
	}
}

#[cfg(test)]
mod tests {
	use relcore_type::Type;

	use super::Operator;
	use crate::{
		def::table::TableVar,
		node::{Characteristics, PlanNode},
	};

	#[test]
	fn test_declared_functional_with_side_effects_is_refused() {
		let table = std::sync::Arc::new(TableVar::builder("T").column("ID", Type::Int4).key(&["ID"]).build());
		let op = Operator::builder("Purge")
			.body(PlanNode::delete(table, None))
			.characteristics(Characteristics::default())
			.build();
		let err = op.validate_characteristics().unwrap_err();
		assert_eq!(err.code(), "CATALOG_005");
	}

	#[test]
	fn test_derived_characteristics_validate() {
		let op = Operator::builder("Inc")
			.operand("X", Type::Int4)
			.returns(Type::Int4)
			.body(PlanNode::assign("Result", PlanNode::variable("X")))
			.build();
		assert!(op.characteristics.is_functional);
		assert!(op.validate_characteristics().is_ok());
	}
}
