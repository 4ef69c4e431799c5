// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use once_cell::sync::OnceCell;
use relcore_type::{ErrorClass, Type, Value};

use crate::def::{operator::Operator, scalar::ScalarType, table::TableVar};

mod build;
mod characteristics;

pub use characteristics::Characteristics;

/// A node of the compiled operation tree.
///
/// Expression nodes produce a value; statement nodes produce a control
/// outcome. An expression used as a statement is wrapped in
/// [`PlanNode::ExpressionStatement`].
#[derive(Debug)]
pub enum PlanNode {
	// === Expressions ===
	Literal(Value),
	/// Reads the nearest visible stack symbol with this name.
	Variable(String),
	ColumnAccess {
		source: Box<PlanNode>,
		column: String,
	},
	Unary {
		op: UnaryOp,
		operand: Box<PlanNode>,
	},
	Binary {
		op: BinaryOp,
		left: Box<PlanNode>,
		right: Box<PlanNode>,
	},
	IsNil(Box<PlanNode>),
	IfNil {
		value: Box<PlanNode>,
		fallback: Box<PlanNode>,
	},
	RowSelector(Vec<(String, PlanNode)>),
	ListSelector(Vec<PlanNode>),
	/// Builds an error value, typically the argument of a `Raise`.
	ErrorSelector {
		class: ErrorClass,
		code: String,
		message: Box<PlanNode>,
	},
	/// The error currently being handled, or nil outside of a handler.
	CurrentError,
	Call(CallNode),
	Table(TableNode),
	/// Rows of `source` for which `condition` holds; each row is visible to
	/// the condition as `value`.
	Restrict {
		source: Box<PlanNode>,
		condition: Box<PlanNode>,
	},
	Exists(Box<PlanNode>),
	Count(Box<PlanNode>),

	// === Statements ===
	Block(Vec<PlanNode>),
	DelimitedBlock(Vec<PlanNode>),
	Frame(Box<PlanNode>),
	ExpressionStatement(Box<PlanNode>),
	If(IfNode),
	Case(CaseNode),
	SelectedCase(SelectedCaseNode),
	While {
		condition: Box<PlanNode>,
		body: Box<PlanNode>,
	},
	DoWhile {
		body: Box<PlanNode>,
		condition: Box<PlanNode>,
	},
	ForEach(ForEachNode),
	Break,
	Continue,
	Exit,
	Raise(Option<Box<PlanNode>>),
	TryFinally {
		body: Box<PlanNode>,
		finally: Box<PlanNode>,
	},
	TryExcept(TryExceptNode),
	Assignment {
		target: String,
		value: Box<PlanNode>,
	},
	VariableDeclaration(VariableDeclarationNode),
	Insert(InsertNode),
	Update(UpdateNode),
	Delete(DeleteNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
	Not,
	Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	Equal,
	NotEqual,
	Less,
	LessOrEqual,
	Greater,
	GreaterOrEqual,
	And,
	Or,
	Add,
	Subtract,
	Multiply,
	Divide,
}

impl Display for BinaryOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let symbol = match self {
			BinaryOp::Equal => "=",
			BinaryOp::NotEqual => "<>",
			BinaryOp::Less => "<",
			BinaryOp::LessOrEqual => "<=",
			BinaryOp::Greater => ">",
			BinaryOp::GreaterOrEqual => ">=",
			BinaryOp::And => "and",
			BinaryOp::Or => "or",
			BinaryOp::Add => "+",
			BinaryOp::Subtract => "-",
			BinaryOp::Multiply => "*",
			BinaryOp::Divide => "/",
		};
		f.write_str(symbol)
	}
}

#[derive(Debug, Clone)]
pub enum CallTarget {
	Operator(Arc<Operator>),
	/// Resolved through the catalog at call time; used for recursive and
	/// forward references.
	Named(String),
}

#[derive(Debug)]
pub struct CallNode {
	pub target: CallTarget,
	pub arguments: Vec<PlanNode>,
}

/// Which rows a table node reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
	/// Rows visible to the process: the application transaction overlay when
	/// its global context is active, the base table otherwise.
	Visible,
	/// Always the base table.
	Base,
}

#[derive(Debug)]
pub struct TableNode {
	pub table: Arc<TableVar>,
	pub source: TableSource,
	populate: OnceCell<Arc<PlanNode>>,
}

impl TableNode {
	pub fn new(table: Arc<TableVar>) -> Self {
		Self {
			table,
			source: TableSource::Visible,
			populate: OnceCell::new(),
		}
	}

	pub fn base(table: Arc<TableVar>) -> Self {
		Self {
			table,
			source: TableSource::Base,
			populate: OnceCell::new(),
		}
	}

	/// The sub-plan that reads the base rows of this table when it is first
	/// touched inside an application transaction. Built on first use.
	pub fn populate_plan(&self) -> &Arc<PlanNode> {
		self.populate.get_or_init(|| Arc::new(PlanNode::Table(TableNode::base(self.table.clone()))))
	}
}

#[derive(Debug)]
pub struct IfNode {
	pub condition: Box<PlanNode>,
	pub then: Box<PlanNode>,
	pub otherwise: Option<Box<PlanNode>>,
}

#[derive(Debug)]
pub struct CaseItem {
	pub when: PlanNode,
	pub then: PlanNode,
}

#[derive(Debug)]
pub struct CaseNode {
	pub items: Vec<CaseItem>,
	pub otherwise: Option<Box<PlanNode>>,
}

/// `case <selector> when <value> then ...`. The selector and each `when`
/// value are pushed as `selector` and `when` while `comparer` is evaluated;
/// without a comparer, built-in equality is used.
#[derive(Debug)]
pub struct SelectedCaseNode {
	pub selector: Box<PlanNode>,
	pub items: Vec<CaseItem>,
	pub otherwise: Option<Box<PlanNode>>,
	pub comparer: Option<Box<PlanNode>>,
}

#[derive(Debug)]
pub struct ForEachNode {
	/// Loop variable. Without a name, each element is pushed anonymously.
	pub variable: Option<String>,
	/// When set, the loop declares its own variable slot; otherwise it
	/// assigns to an existing variable of that name.
	pub is_allocation: bool,
	pub source: Box<PlanNode>,
	pub body: Box<PlanNode>,
}

#[derive(Debug)]
pub struct ExceptHandler {
	/// `None` catches every catchable error.
	pub class: Option<ErrorClass>,
	/// Binds the caught error to a scoped variable of this name.
	pub variable: Option<String>,
	pub body: PlanNode,
}

#[derive(Debug)]
pub struct TryExceptNode {
	pub body: Box<PlanNode>,
	pub handlers: Vec<ExceptHandler>,
}

#[derive(Debug)]
pub struct VariableDeclarationNode {
	pub name: String,
	pub ty: Type,
	pub domain: Option<Arc<ScalarType>>,
	pub initializer: Option<Box<PlanNode>>,
}

#[derive(Debug)]
pub struct InsertNode {
	pub table: TableNode,
	/// Evaluates to a row or a table of rows.
	pub source: Box<PlanNode>,
}

#[derive(Debug)]
pub struct UpdateNode {
	pub table: TableNode,
	pub condition: Option<Box<PlanNode>>,
	/// Column assignments, evaluated with the current row visible as `value`.
	pub assignments: Vec<(String, PlanNode)>,
}

#[derive(Debug)]
pub struct DeleteNode {
	pub table: TableNode,
	pub condition: Option<Box<PlanNode>>,
}
