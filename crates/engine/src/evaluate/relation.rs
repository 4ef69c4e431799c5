// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::{PlanNode, TableNode, TableSource};
use relcore_type::{Result, Row, Type, Value, error::diagnostic::runtime::type_mismatch, return_error};

use crate::{Context, scope::FrameScope, stack::Symbol};

impl Context {
	/// Rows of a table node as this process sees them: the application
	/// transaction overlay while its global context is pushed, the base table
	/// otherwise.
	pub(crate) fn table_rows(&mut self, node: &TableNode) -> Result<Vec<Row>> {
		if node.source == TableSource::Visible {
			if let Some(app) = self.active_app() {
				if !self.is_insert {
					self.populate(&app, &node.table, node.populate_plan())?;
				}
				return Ok(app.overlay(&node.table).scan());
			}
		}
		Ok(self.services.store.handle(&node.table).scan())
	}

	pub(crate) fn rows_of(&mut self, node: &PlanNode) -> Result<Vec<Row>> {
		match self.evaluate(node)? {
			Value::Table(rows) => Ok(rows),
			Value::Row(row) => Ok(vec![*row]),
			Value::Nil => Ok(Vec::new()),
			other => return_error!(type_mismatch("Table", other.kind())),
		}
	}

	/// Rows of `source` for which `condition` holds, with each row visible to
	/// the condition as `value`.
	pub(crate) fn restrict(&mut self, source: &PlanNode, condition: &PlanNode) -> Result<Vec<Row>> {
		let rows = self.rows_of(source)?;
		let mut selected = Vec::new();
		for row in rows {
			if self.holds_for(&row, condition)? {
				selected.push(row);
			}
		}
		Ok(selected)
	}

	pub(crate) fn holds_for(&mut self, row: &Row, condition: &PlanNode) -> Result<bool> {
		let mut frame = FrameScope::push(self);
		frame.push(Symbol::new("value", Type::Row(row.row_type().clone()), Value::row(row.clone())))?;
		frame.condition(condition)
	}
}
