// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::{DeleteNode, InsertNode, PlanNode, TableNode, UpdateNode};
use relcore_type::{
	Result, Row, Type, Value, error::diagnostic::catalog::column_not_found, return_error,
};
use tracing::debug;

use crate::{Context, Outcome, scope::FrameScope, stack::Symbol};

impl Context {
	/// Inserts every row the source yields. The statement is atomic.
	pub(crate) fn execute_insert(&mut self, node: &InsertNode) -> Result<Outcome> {
		let rows = self.rows_of(&node.source)?;
		let table = &node.table.table;
		self.atomically(|ctx| {
			let mut inserted = 0usize;
			for row in &rows {
				ctx.check_aborted()?;
				inserted += ctx.insert_row(table, row)? as usize;
			}
			debug!(table = %table.name, inserted, "insert");
			Ok(Outcome::Normal)
		})
	}

	/// Applies the assignments to every row satisfying the condition. The
	/// assignments see the row as it was before the statement.
	pub(crate) fn execute_update(&mut self, node: &UpdateNode) -> Result<Outcome> {
		let rows = self.matching_rows(&node.table, node.condition.as_deref())?;
		let table = &node.table.table;
		let check_concurrency = self.config().check_concurrency;
		self.atomically(|ctx| {
			let mut updated = 0usize;
			for old in &rows {
				ctx.check_aborted()?;
				let new = ctx.assigned_row(node, old)?;
				updated += ctx.update_row(table, old, &new, check_concurrency)? as usize;
			}
			debug!(table = %table.name, updated, "update");
			Ok(Outcome::Normal)
		})
	}

	pub(crate) fn execute_delete(&mut self, node: &DeleteNode) -> Result<Outcome> {
		let rows = self.matching_rows(&node.table, node.condition.as_deref())?;
		let table = &node.table.table;
		let check_concurrency = self.config().check_concurrency;
		self.atomically(|ctx| {
			let mut deleted = 0usize;
			for old in &rows {
				ctx.check_aborted()?;
				deleted += ctx.delete_row(table, old, check_concurrency)? as usize;
			}
			debug!(table = %table.name, deleted, "delete");
			Ok(Outcome::Normal)
		})
	}

	fn matching_rows(&mut self, table: &TableNode, condition: Option<&PlanNode>) -> Result<Vec<Row>> {
		let rows = self.table_rows(table)?;
		let Some(condition) = condition else {
			return Ok(rows);
		};
		let mut selected = Vec::new();
		for row in rows {
			if self.holds_for(&row, condition)? {
				selected.push(row);
			}
		}
		Ok(selected)
	}

	fn assigned_row(&mut self, node: &UpdateNode, old: &Row) -> Result<Row> {
		let mut new = old.clone();
		let mut frame = FrameScope::push(self);
		frame.push(Symbol::new("value", Type::Row(old.row_type().clone()), Value::row(old.clone())))?;
		for (column, expression) in &node.assignments {
			let value = frame.evaluate(expression)?;
			if !new.set_by_name(column, value) {
				return_error!(column_not_found(&node.table.table.name, column));
			}
		}
		Ok(new)
	}
}
