// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{CallTarget, PlanNode};
use crate::def::operator::OperatorBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Characteristics {
	pub is_literal: bool,
	/// No side effects.
	pub is_functional: bool,
	/// Same result for the same inputs.
	pub is_deterministic: bool,
	/// Same result within the same transaction.
	pub is_repeatable: bool,
	pub is_nilable: bool,
}

impl Default for Characteristics {
	fn default() -> Self {
		Self {
			is_literal: false,
			is_functional: true,
			is_deterministic: true,
			is_repeatable: true,
			is_nilable: true,
		}
	}
}

impl Characteristics {
	pub fn literal(is_nil: bool) -> Self {
		Self {
			is_literal: true,
			is_functional: true,
			is_deterministic: true,
			is_repeatable: true,
			is_nilable: is_nil,
		}
	}

	pub fn side_effecting() -> Self {
		Self {
			is_literal: false,
			is_functional: false,
			is_deterministic: false,
			is_repeatable: false,
			is_nilable: true,
		}
	}

	/// Combines the characteristics of a node with those of a child.
	pub fn and(self, other: Characteristics) -> Self {
		Self {
			is_literal: self.is_literal && other.is_literal,
			is_functional: self.is_functional && other.is_functional,
			is_deterministic: self.is_deterministic && other.is_deterministic,
			is_repeatable: self.is_repeatable && other.is_repeatable,
			is_nilable: self.is_nilable || other.is_nilable,
		}
	}
}

impl PlanNode {
	pub fn characteristics(&self) -> Characteristics {
		match self {
			PlanNode::Literal(value) => Characteristics::literal(value.is_nil()),
			PlanNode::Variable(_) | PlanNode::CurrentError => Characteristics::default(),
			PlanNode::ColumnAccess {
				source,
				..
			} => non_literal(source.characteristics()),
			PlanNode::Unary {
				operand,
				..
			} => operand.characteristics(),
			PlanNode::Binary {
				left,
				right,
				..
			} => left.characteristics().and(right.characteristics()),
			PlanNode::IsNil(operand) => Characteristics {
				is_nilable: false,
				..operand.characteristics()
			},
			PlanNode::IfNil {
				value,
				fallback,
			} => value.characteristics().and(fallback.characteristics()),
			PlanNode::RowSelector(columns) => Characteristics {
				is_nilable: false,
				..all(columns.iter().map(|(_, n)| n))
			},
			PlanNode::ListSelector(items) => Characteristics {
				is_nilable: false,
				..all(items.iter())
			},
			PlanNode::ErrorSelector {
				message,
				..
			} => non_literal(message.characteristics()),
			PlanNode::Call(call) => {
				let declared = match &call.target {
					CallTarget::Operator(operator) => match &operator.body {
						OperatorBody::Plan(_) | OperatorBody::Native(_) => operator.characteristics,
					},
					CallTarget::Named(_) => Characteristics::side_effecting(),
				};
				non_literal(declared.and(all(call.arguments.iter())))
			}
			// Table reads see concurrent changes, so they are not repeatable
			// across transactions.
			PlanNode::Table(_) => Characteristics {
				is_literal: false,
				is_functional: true,
				is_deterministic: true,
				is_repeatable: false,
				is_nilable: false,
			},
			PlanNode::Restrict {
				source,
				condition,
			} => non_literal(source.characteristics().and(condition.characteristics())),
			PlanNode::Exists(source) | PlanNode::Count(source) => Characteristics {
				is_nilable: false,
				..non_literal(source.characteristics())
			},
			PlanNode::Block(statements) | PlanNode::DelimitedBlock(statements) => {
				non_literal(all(statements.iter()))
			}
			PlanNode::Frame(child) | PlanNode::ExpressionStatement(child) => non_literal(child.characteristics()),
			PlanNode::If(node) => non_literal(
				node.condition
					.characteristics()
					.and(node.then.characteristics())
					.and(optional(node.otherwise.as_deref())),
			),
			PlanNode::Case(node) => non_literal(
				all(node.items.iter().flat_map(|i| [&i.when, &i.then]))
					.and(optional(node.otherwise.as_deref())),
			),
			PlanNode::SelectedCase(node) => non_literal(
				node.selector
					.characteristics()
					.and(all(node.items.iter().flat_map(|i| [&i.when, &i.then])))
					.and(optional(node.otherwise.as_deref()))
					.and(optional(node.comparer.as_deref())),
			),
			PlanNode::While {
				condition,
				body,
			}
			| PlanNode::DoWhile {
				body,
				condition,
			} => non_literal(condition.characteristics().and(body.characteristics())),
			PlanNode::ForEach(node) => non_literal(node.source.characteristics().and(node.body.characteristics())),
			PlanNode::Break | PlanNode::Continue | PlanNode::Exit => non_literal(Characteristics::default()),
			PlanNode::Raise(error) => non_literal(optional(error.as_deref())),
			PlanNode::TryFinally {
				body,
				finally,
			} => non_literal(body.characteristics().and(finally.characteristics())),
			PlanNode::TryExcept(node) => {
				non_literal(node.body.characteristics().and(all(node.handlers.iter().map(|h| &h.body))))
			}
			// Local variable writes are confined to the invocation and do not
			// count as side effects.
			PlanNode::Assignment {
				value,
				..
			} => non_literal(value.characteristics()),
			PlanNode::VariableDeclaration(node) => non_literal(optional(node.initializer.as_deref())),
			PlanNode::Insert(_) | PlanNode::Update(_) | PlanNode::Delete(_) => Characteristics::side_effecting(),
		}
	}
}

fn non_literal(c: Characteristics) -> Characteristics {
	Characteristics {
		is_literal: false,
		..c
	}
}

fn optional(node: Option<&PlanNode>) -> Characteristics {
	node.map(PlanNode::characteristics).unwrap_or_else(|| Characteristics::literal(false))
}

fn all<'a>(nodes: impl Iterator<Item = &'a PlanNode>) -> Characteristics {
	nodes.fold(Characteristics::literal(false), |acc, n| acc.and(n.characteristics()))
}
