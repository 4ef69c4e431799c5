// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::PlanNode;
use relcore_type::{
	Error, Result, Row, Value,
	error::diagnostic::{
		catalog::column_not_found,
		internal::missing_node_shape,
		runtime::{raised, type_mismatch},
	},
	return_error,
};

use crate::Context;

mod operator;
mod relation;

impl Context {
	/// Evaluates an expression node.
	pub(crate) fn evaluate(&mut self, node: &PlanNode) -> Result<Value> {
		match node {
			PlanNode::Literal(value) => Ok(value.clone()),
			PlanNode::Variable(name) => self.read_variable(name),
			PlanNode::ColumnAccess {
				source,
				column,
			} => {
				let source = self.evaluate(source)?;
				column_of(source, column)
			}
			PlanNode::Unary {
				op,
				operand,
			} => {
				let operand = self.evaluate(operand)?;
				operator::unary(*op, operand)
			}
			PlanNode::Binary {
				op,
				left,
				right,
			} => self.binary(*op, left, right),
			PlanNode::IsNil(operand) => Ok(Value::Boolean(self.evaluate(operand)?.is_nil())),
			PlanNode::IfNil {
				value,
				fallback,
			} => match self.evaluate(value)? {
				Value::Nil => self.evaluate(fallback),
				value => Ok(value),
			},
			PlanNode::RowSelector(columns) => {
				let mut pairs = Vec::with_capacity(columns.len());
				for (name, expression) in columns {
					pairs.push((name.clone(), self.evaluate(expression)?));
				}
				Ok(Value::row(Row::from_pairs(pairs)))
			}
			PlanNode::ListSelector(items) => {
				items.iter().map(|item| self.evaluate(item)).collect::<Result<Vec<_>>>().map(Value::List)
			}
			PlanNode::ErrorSelector {
				class,
				code,
				message,
			} => {
				let message = match self.evaluate(message)? {
					Value::Utf8(text) => text,
					Value::Nil => String::new(),
					other => other.to_string(),
				};
				Ok(Value::error(Error(raised(*class, code.clone(), message))))
			}
			PlanNode::CurrentError => Ok(self.errors.last().cloned().map(Value::error).unwrap_or(Value::Nil)),
			PlanNode::Call(call) => self.call(call),
			PlanNode::Table(table) => self.table_rows(table).map(Value::Table),
			PlanNode::Restrict {
				source,
				condition,
			} => self.restrict(source, condition).map(Value::Table),
			PlanNode::Exists(source) => Ok(Value::Boolean(!self.rows_of(source)?.is_empty())),
			PlanNode::Count(source) => Ok(Value::Int8(self.rows_of(source)?.len() as i64)),
			statement => return_error!(missing_node_shape(&format!("an expression, found {}", describe(statement)))),
		}
	}

	/// Evaluates `node` as a condition.
	pub(crate) fn condition(&mut self, node: &PlanNode) -> Result<bool> {
		let value = self.evaluate(node)?;
		self.truth(value)
	}
}

fn column_of(source: Value, column: &str) -> Result<Value> {
	match source {
		Value::Nil => Ok(Value::Nil),
		Value::Row(row) => match row.get_by_name(column) {
			Some(value) => Ok(value.clone()),
			None => return_error!(column_not_found("row", column)),
		},
		other => return_error!(type_mismatch("Row", other.kind())),
	}
}

pub(crate) fn describe(node: &PlanNode) -> &'static str {
	match node {
		PlanNode::Literal(_) => "Literal",
		PlanNode::Variable(_) => "Variable",
		PlanNode::ColumnAccess {
			..
		} => "ColumnAccess",
		PlanNode::Unary {
			..
		} => "Unary",
		PlanNode::Binary {
			..
		} => "Binary",
		PlanNode::IsNil(_) => "IsNil",
		PlanNode::IfNil {
			..
		} => "IfNil",
		PlanNode::RowSelector(_) => "RowSelector",
		PlanNode::ListSelector(_) => "ListSelector",
		PlanNode::ErrorSelector {
			..
		} => "ErrorSelector",
		PlanNode::CurrentError => "CurrentError",
		PlanNode::Call(_) => "Call",
		PlanNode::Table(_) => "Table",
		PlanNode::Restrict {
			..
		} => "Restrict",
		PlanNode::Exists(_) => "Exists",
		PlanNode::Count(_) => "Count",
		PlanNode::Block(_) => "Block",
		PlanNode::DelimitedBlock(_) => "DelimitedBlock",
		PlanNode::Frame(_) => "Frame",
		PlanNode::ExpressionStatement(_) => "ExpressionStatement",
		PlanNode::If(_) => "If",
		PlanNode::Case(_) => "Case",
		PlanNode::SelectedCase(_) => "SelectedCase",
		PlanNode::While {
			..
		} => "While",
		PlanNode::DoWhile {
			..
		} => "DoWhile",
		PlanNode::ForEach(_) => "ForEach",
		PlanNode::Break => "Break",
		PlanNode::Continue => "Continue",
		PlanNode::Exit => "Exit",
		PlanNode::Raise(_) => "Raise",
		PlanNode::TryFinally {
			..
		} => "TryFinally",
		PlanNode::TryExcept(_) => "TryExcept",
		PlanNode::Assignment {
			..
		} => "Assignment",
		PlanNode::VariableDeclaration(_) => "VariableDeclaration",
		PlanNode::Insert(_) => "Insert",
		PlanNode::Update(_) => "Update",
		PlanNode::Delete(_) => "Delete",
	}
}
