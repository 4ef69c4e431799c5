// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use once_cell::sync::OnceCell;
use relcore_type::{RowType, Type};

use super::{
	constraint::Constraint,
	event::{EventHandler, EventHandlers},
	scalar::ScalarType,
};
use crate::node::{BinaryOp, PlanNode};

#[derive(Debug, Clone)]
pub struct TableVarColumn {
	pub name: String,
	pub ty: Type,
	pub domain: Option<Arc<ScalarType>>,
	pub is_nilable: bool,
	pub default: Option<Arc<PlanNode>>,
	/// Derived column, recomputed from the row (visible as `value`) on every
	/// insert and update.
	pub computed: Option<Arc<PlanNode>>,
	pub should_validate: bool,
	pub should_default: bool,
	pub should_change: bool,
	pub constraints: Vec<Constraint>,
	pub handlers: EventHandlers,
}

impl TableVarColumn {
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
			domain: None,
			is_nilable: false,
			default: None,
			computed: None,
			should_validate: true,
			should_default: true,
			should_change: true,
			constraints: Vec::new(),
			handlers: EventHandlers::default(),
		}
	}

	pub fn nilable(mut self) -> Self {
		self.is_nilable = true;
		self
	}

	pub fn with_domain(mut self, domain: Arc<ScalarType>) -> Self {
		self.domain = Some(domain);
		self
	}

	pub fn with_default(mut self, default: PlanNode) -> Self {
		self.default = Some(Arc::new(default));
		self
	}

	pub fn computed(mut self, expression: PlanNode) -> Self {
		self.computed = Some(Arc::new(expression));
		self
	}

	pub fn with_constraint(mut self, constraint: Constraint) -> Self {
		self.constraints.push(constraint);
		self
	}

	pub fn with_handler(mut self, handler: EventHandler) -> Self {
		self.handlers.add(handler);
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
	pub columns: Vec<String>,
	/// Rows with a nil in any key column are exempt from uniqueness.
	pub is_sparse: bool,
	pub is_clustered: bool,
}

impl Key {
	pub fn new(columns: &[&str]) -> Self {
		Self {
			columns: columns.iter().map(|c| c.to_string()).collect(),
			is_sparse: false,
			is_clustered: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderColumn {
	pub column: String,
	pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
	pub columns: Vec<OrderColumn>,
}

impl Order {
	pub fn ascending(columns: &[&str]) -> Self {
		Self {
			columns: columns
				.iter()
				.map(|c| OrderColumn {
					column: c.to_string(),
					ascending: true,
				})
				.collect(),
		}
	}
}

/// Runtime schema descriptor of a relational variable.
#[derive(Debug)]
pub struct TableVar {
	pub name: String,
	pub row_type: Arc<RowType>,
	pub columns: Vec<TableVarColumn>,
	pub keys: Vec<Key>,
	pub orders: Vec<Order>,
	/// Row constraints; the row is visible as `value`.
	pub constraints: Vec<Constraint>,
	/// Transition constraints; the new row is visible as `new`.
	pub insert_constraints: Vec<Constraint>,
	/// Transition constraints; the rows are visible as `old` and `new`.
	pub update_constraints: Vec<Constraint>,
	/// Transition constraints; the old row is visible as `old`.
	pub delete_constraints: Vec<Constraint>,
	pub handlers: EventHandlers,
	pub should_validate: bool,
	pub should_default: bool,
	pub should_change: bool,
	key_condition: OnceCell<Arc<PlanNode>>,
}

impl TableVar {
	pub fn builder(name: impl Into<String>) -> TableVarBuilder {
		TableVarBuilder::new(name)
	}

	pub fn column(&self, name: &str) -> Option<&TableVarColumn> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.row_type.index_of(name)
	}

	/// The clustered key, else the first key.
	pub fn clustering_key(&self) -> Option<&Key> {
		self.keys.iter().find(|k| k.is_clustered).or_else(|| self.keys.first())
	}

	/// Columns identifying a row: the clustering key, or every column for a
	/// table without keys.
	pub fn identity_columns(&self) -> Vec<String> {
		match self.clustering_key() {
			Some(key) => key.columns.clone(),
			None => self.row_type.names().map(str::to_string).collect(),
		}
	}

	/// Sort order of scans: the first order, else the clustering key.
	pub fn scan_order(&self) -> Option<Order> {
		self.orders.first().cloned().or_else(|| {
			self.clustering_key().map(|key| Order {
				columns: key
					.columns
					.iter()
					.map(|c| OrderColumn {
						column: c.clone(),
						ascending: true,
					})
					.collect(),
			})
		})
	}

	pub fn has_deferred_constraints(&self) -> bool {
		self.constraints
			.iter()
			.chain(&self.insert_constraints)
			.chain(&self.update_constraints)
			.chain(&self.delete_constraints)
			.any(|c| c.is_deferred)
	}

	/// Condition selecting the stored row that matches `key` on the identity
	/// columns, with the candidate visible as `value`. Nil matches nil, as in
	/// the store. Generated on first use and cached.
	pub fn key_condition(&self) -> &Arc<PlanNode> {
		self.key_condition.get_or_init(|| {
			let condition = self
				.identity_columns()
				.into_iter()
				.map(|column| {
					let stored = || PlanNode::column(PlanNode::variable("value"), column.clone());
					let key = || PlanNode::column(PlanNode::variable("key"), column.clone());
					PlanNode::binary(
						BinaryOp::Or,
						PlanNode::binary(BinaryOp::And, PlanNode::is_nil(stored()), PlanNode::is_nil(key())),
						PlanNode::eq(stored(), key()),
					)
				})
				.reduce(|acc, next| PlanNode::binary(BinaryOp::And, acc, next))
				.unwrap_or_else(|| PlanNode::literal(true));
			Arc::new(condition)
		})
	}
}

pub struct TableVarBuilder {
	name: String,
	columns: Vec<TableVarColumn>,
	keys: Vec<Key>,
	orders: Vec<Order>,
	constraints: Vec<Constraint>,
	insert_constraints: Vec<Constraint>,
	update_constraints: Vec<Constraint>,
	delete_constraints: Vec<Constraint>,
	handlers: EventHandlers,
	should_validate: bool,
	should_default: bool,
	should_change: bool,
}

impl TableVarBuilder {
	fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			columns: Vec::new(),
			keys: Vec::new(),
			orders: Vec::new(),
			constraints: Vec::new(),
			insert_constraints: Vec::new(),
			update_constraints: Vec::new(),
			delete_constraints: Vec::new(),
			handlers: EventHandlers::default(),
			should_validate: true,
			should_default: true,
			should_change: true,
		}
	}

	pub fn column(self, name: impl Into<String>, ty: Type) -> Self {
		self.column_def(TableVarColumn::new(name, ty))
	}

	pub fn nilable_column(self, name: impl Into<String>, ty: Type) -> Self {
		self.column_def(TableVarColumn::new(name, ty).nilable())
	}

	pub fn column_def(mut self, column: TableVarColumn) -> Self {
		self.columns.push(column);
		self
	}

	pub fn key(mut self, columns: &[&str]) -> Self {
		self.keys.push(Key::new(columns));
		self
	}

	pub fn sparse_key(mut self, columns: &[&str]) -> Self {
		self.keys.push(Key {
			is_sparse: true,
			..Key::new(columns)
		});
		self
	}

	pub fn clustered_key(mut self, columns: &[&str]) -> Self {
		self.keys.push(Key {
			is_clustered: true,
			..Key::new(columns)
		});
		self
	}

	pub fn order(mut self, order: Order) -> Self {
		self.orders.push(order);
		self
	}

	pub fn constraint(mut self, constraint: Constraint) -> Self {
		self.constraints.push(constraint);
		self
	}

	pub fn insert_constraint(mut self, constraint: Constraint) -> Self {
		self.insert_constraints.push(constraint);
		self
	}

	pub fn update_constraint(mut self, constraint: Constraint) -> Self {
		self.update_constraints.push(constraint);
		self
	}

	pub fn delete_constraint(mut self, constraint: Constraint) -> Self {
		self.delete_constraints.push(constraint);
		self
	}

	pub fn handler(mut self, handler: EventHandler) -> Self {
		self.handlers.add(handler);
		self
	}

	pub fn should_validate(mut self, value: bool) -> Self {
		self.should_validate = value;
		self
	}

	pub fn should_default(mut self, value: bool) -> Self {
		self.should_default = value;
		self
	}

	pub fn should_change(mut self, value: bool) -> Self {
		self.should_change = value;
		self
	}

	pub fn build(self) -> TableVar {
		let row_type = Arc::new(RowType::new(self.columns.iter().map(|c| (c.name.clone(), c.ty.clone()))));
		TableVar {
			name: self.name,
			row_type,
			columns: self.columns,
			keys: self.keys,
			orders: self.orders,
			constraints: self.constraints,
			insert_constraints: self.insert_constraints,
			update_constraints: self.update_constraints,
			delete_constraints: self.delete_constraints,
			handlers: self.handlers,
			should_validate: self.should_validate,
			should_default: self.should_default,
			should_change: self.should_change,
			key_condition: OnceCell::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use relcore_type::Type;

	use super::{Order, TableVar};
	use crate::node::PlanNode;

	#[test]
	fn test_clustering_key_prefers_clustered() {
		let table = TableVar::builder("T")
			.column("ID", Type::Int4)
			.column("Code", Type::Utf8)
			.key(&["Code"])
			.clustered_key(&["ID"])
			.build();
		assert_eq!(table.clustering_key().unwrap().columns, vec!["ID".to_string()]);
	}

	#[test]
	fn test_scan_order_falls_back_to_key() {
		let table = TableVar::builder("T").column("ID", Type::Int4).key(&["ID"]).build();
		assert_eq!(table.scan_order(), Some(Order::ascending(&["ID"])));
	}

	#[test]
	fn test_key_condition_is_cached() {
		let table = TableVar::builder("T").column("ID", Type::Int4).key(&["ID"]).build();
		let first = table.key_condition().clone();
		let second = table.key_condition().clone();
		assert!(std::sync::Arc::ptr_eq(&first, &second));
		assert!(matches!(*first, PlanNode::Binary { .. }));
	}

	#[test]
	fn test_identity_without_keys_is_every_column() {
		let table = TableVar::builder("T").column("A", Type::Int4).nilable_column("B", Type::Utf8).build();
		assert_eq!(table.identity_columns(), vec!["A".to_string(), "B".to_string()]);
	}
}
