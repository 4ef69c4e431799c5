// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shorthand constructors used by the compiler and by tests.

use std::sync::Arc;

use relcore_type::{ErrorClass, Type, Value};

use super::{
	BinaryOp, CallNode, CallTarget, CaseItem, CaseNode, DeleteNode, ExceptHandler, ForEachNode, IfNode,
	InsertNode, PlanNode, SelectedCaseNode, TableNode, TryExceptNode, UnaryOp, UpdateNode, VariableDeclarationNode,
};
use crate::def::{operator::Operator, table::TableVar};

impl PlanNode {
	pub fn literal(value: impl Into<Value>) -> Self {
		PlanNode::Literal(value.into())
	}

	pub fn nil() -> Self {
		PlanNode::Literal(Value::Nil)
	}

	pub fn variable(name: impl Into<String>) -> Self {
		PlanNode::Variable(name.into())
	}

	pub fn column(source: PlanNode, column: impl Into<String>) -> Self {
		PlanNode::ColumnAccess {
			source: Box::new(source),
			column: column.into(),
		}
	}

	pub fn not(operand: PlanNode) -> Self {
		PlanNode::Unary {
			op: UnaryOp::Not,
			operand: Box::new(operand),
		}
	}

	pub fn binary(op: BinaryOp, left: PlanNode, right: PlanNode) -> Self {
		PlanNode::Binary {
			op,
			left: Box::new(left),
			right: Box::new(right),
		}
	}

	pub fn eq(left: PlanNode, right: PlanNode) -> Self {
		Self::binary(BinaryOp::Equal, left, right)
	}

	pub fn is_nil(operand: PlanNode) -> Self {
		PlanNode::IsNil(Box::new(operand))
	}

	pub fn row<N: Into<String>>(columns: impl IntoIterator<Item = (N, PlanNode)>) -> Self {
		PlanNode::RowSelector(columns.into_iter().map(|(n, c)| (n.into(), c)).collect())
	}

	pub fn list(items: impl IntoIterator<Item = PlanNode>) -> Self {
		PlanNode::ListSelector(items.into_iter().collect())
	}

	pub fn error(class: ErrorClass, code: impl Into<String>, message: impl Into<String>) -> Self {
		PlanNode::ErrorSelector {
			class,
			code: code.into(),
			message: Box::new(PlanNode::literal(message.into())),
		}
	}

	pub fn call(operator: Arc<Operator>, arguments: impl IntoIterator<Item = PlanNode>) -> Self {
		PlanNode::Call(CallNode {
			target: CallTarget::Operator(operator),
			arguments: arguments.into_iter().collect(),
		})
	}

	pub fn call_named(name: impl Into<String>, arguments: impl IntoIterator<Item = PlanNode>) -> Self {
		PlanNode::Call(CallNode {
			target: CallTarget::Named(name.into()),
			arguments: arguments.into_iter().collect(),
		})
	}

	pub fn table(table: Arc<TableVar>) -> Self {
		PlanNode::Table(TableNode::new(table))
	}

	pub fn restrict(source: PlanNode, condition: PlanNode) -> Self {
		PlanNode::Restrict {
			source: Box::new(source),
			condition: Box::new(condition),
		}
	}

	pub fn exists(source: PlanNode) -> Self {
		PlanNode::Exists(Box::new(source))
	}

	pub fn count(source: PlanNode) -> Self {
		PlanNode::Count(Box::new(source))
	}

	pub fn block(statements: impl IntoIterator<Item = PlanNode>) -> Self {
		PlanNode::Block(statements.into_iter().collect())
	}

	pub fn frame(child: PlanNode) -> Self {
		PlanNode::Frame(Box::new(child))
	}

	pub fn statement(expression: PlanNode) -> Self {
		PlanNode::ExpressionStatement(Box::new(expression))
	}

	pub fn if_then(condition: PlanNode, then: PlanNode, otherwise: Option<PlanNode>) -> Self {
		PlanNode::If(IfNode {
			condition: Box::new(condition),
			then: Box::new(then),
			otherwise: otherwise.map(Box::new),
		})
	}

	pub fn case(items: impl IntoIterator<Item = (PlanNode, PlanNode)>, otherwise: Option<PlanNode>) -> Self {
		PlanNode::Case(CaseNode {
			items: items
				.into_iter()
				.map(|(when, then)| CaseItem {
					when,
					then,
				})
				.collect(),
			otherwise: otherwise.map(Box::new),
		})
	}

	/// Selected case compared by equality. Set `comparer` on the node for a
	/// custom comparison.
	pub fn selected_case(
		selector: PlanNode,
		items: impl IntoIterator<Item = (PlanNode, PlanNode)>,
		otherwise: Option<PlanNode>,
	) -> Self {
		PlanNode::SelectedCase(SelectedCaseNode {
			selector: Box::new(selector),
			items: items
				.into_iter()
				.map(|(when, then)| CaseItem {
					when,
					then,
				})
				.collect(),
			otherwise: otherwise.map(Box::new),
			comparer: None,
		})
	}

	pub fn while_loop(condition: PlanNode, body: PlanNode) -> Self {
		PlanNode::While {
			condition: Box::new(condition),
			body: Box::new(body),
		}
	}

	pub fn do_while(body: PlanNode, condition: PlanNode) -> Self {
		PlanNode::DoWhile {
			body: Box::new(body),
			condition: Box::new(condition),
		}
	}

	pub fn for_each(variable: impl Into<String>, source: PlanNode, body: PlanNode) -> Self {
		PlanNode::ForEach(ForEachNode {
			variable: Some(variable.into()),
			is_allocation: true,
			source: Box::new(source),
			body: Box::new(body),
		})
	}

	pub fn raise(error: PlanNode) -> Self {
		PlanNode::Raise(Some(Box::new(error)))
	}

	pub fn reraise() -> Self {
		PlanNode::Raise(None)
	}

	pub fn try_finally(body: PlanNode, finally: PlanNode) -> Self {
		PlanNode::TryFinally {
			body: Box::new(body),
			finally: Box::new(finally),
		}
	}

	pub fn try_except(body: PlanNode, handlers: impl IntoIterator<Item = ExceptHandler>) -> Self {
		PlanNode::TryExcept(TryExceptNode {
			body: Box::new(body),
			handlers: handlers.into_iter().collect(),
		})
	}

	pub fn assign(target: impl Into<String>, value: PlanNode) -> Self {
		PlanNode::Assignment {
			target: target.into(),
			value: Box::new(value),
		}
	}

	pub fn declare(name: impl Into<String>, ty: Type, initializer: Option<PlanNode>) -> Self {
		PlanNode::VariableDeclaration(VariableDeclarationNode {
			name: name.into(),
			ty,
			domain: None,
			initializer: initializer.map(Box::new),
		})
	}

	pub fn insert(table: Arc<TableVar>, source: PlanNode) -> Self {
		PlanNode::Insert(InsertNode {
			table: TableNode::new(table),
			source: Box::new(source),
		})
	}

	pub fn update<N: Into<String>>(
		table: Arc<TableVar>,
		condition: Option<PlanNode>,
		assignments: impl IntoIterator<Item = (N, PlanNode)>,
	) -> Self {
		PlanNode::Update(UpdateNode {
			table: TableNode::new(table),
			condition: condition.map(Box::new),
			assignments: assignments.into_iter().map(|(n, v)| (n.into(), v)).collect(),
		})
	}

	pub fn delete(table: Arc<TableVar>, condition: Option<PlanNode>) -> Self {
		PlanNode::Delete(DeleteNode {
			table: TableNode::new(table),
			condition: condition.map(Box::new),
		})
	}
}

impl ExceptHandler {
	pub fn catch_all(body: PlanNode) -> Self {
		Self {
			class: None,
			variable: None,
			body,
		}
	}

	pub fn catch(class: ErrorClass, variable: Option<&str>, body: PlanNode) -> Self {
		Self {
			class: Some(class),
			variable: variable.map(str::to_string),
			body,
		}
	}
}
