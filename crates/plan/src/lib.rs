// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Artifacts produced by the compiler: the plan-node tree executed by the
//! engine and the runtime descriptors (table variables, operators, scalar
//! types) the tree refers to. Everything here is immutable once built,
//! except for lazily generated sub-plans.

pub mod def;
pub mod node;

pub use def::{
	constraint::Constraint,
	event::{EventHandler, EventHandlers, EventKind, HandlerChain},
	operator::{Modifier, NativeOperator, Operand, Operator, OperatorBody},
	scalar::ScalarType,
	table::{Key, Order, OrderColumn, TableVar, TableVarBuilder, TableVarColumn},
};
pub use node::{
	BinaryOp, CallNode, CallTarget, CaseItem, CaseNode, Characteristics, DeleteNode, ExceptHandler,
	ForEachNode, IfNode, InsertNode, PlanNode, SelectedCaseNode, TableNode, TableSource, TryExceptNode, UnaryOp,
	UpdateNode,
	VariableDeclarationNode,
};
