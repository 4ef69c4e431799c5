// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::{TableNode, TableVar};
use relcore_type::{
	Result, Row, Type, Value,
	error::diagnostic::concurrency::{row_conflict, row_not_found},
	return_error,
};
use tracing::{instrument, warn};

use crate::{Context, scope::FrameScope, stack::Symbol};

impl Context {
	/// The row an update or delete applies to, shaped like the table's rows.
	///
	/// A row shaped like the table is taken as is unless `check_concurrency`
	/// is set. Otherwise the stored row is reselected through the table's key
	/// and, when checking, every column the caller supplied must still hold
	/// the value the caller saw.
	#[instrument(name = "engine::mutate::prepare_old_row", level = "trace", skip_all, fields(table = %table.name, check_concurrency = check_concurrency))]
	pub(super) fn prepare_old_row(&mut self, table: &Arc<TableVar>, old: &Row, check_concurrency: bool) -> Result<Row> {
		if !check_concurrency && old.row_type().is_compatible(&table.row_type) {
			return Ok(old.conform(&table.row_type));
		}
		let Some(stored) = self.reselect(table, old)? else {
			warn!(table = %table.name, "row to modify not found");
			return_error!(row_not_found(&table.name));
		};
		if check_concurrency {
			for (name, seen) in old.row_type().names().zip(old.values()) {
				let Some(current) = stored.get_by_name(name) else {
					continue;
				};
				if !seen.same(current) {
					warn!(table = %table.name, column = name, "row changed by another writer");
					return_error!(row_conflict(&table.name, name));
				}
			}
		}
		Ok(stored)
	}

	/// The visible row whose identity matches `old`.
	pub(super) fn reselect(&mut self, table: &Arc<TableVar>, old: &Row) -> Result<Option<Row>> {
		let rows = self.table_rows(&TableNode::new(table.clone()))?;
		let condition = table.key_condition().clone();
		let mut frame = FrameScope::push(self);
		frame.push(Symbol::new("key", Type::Row(old.row_type().clone()), Value::row(old.clone())))?;
		for row in rows {
			if frame.holds_for(&row, &condition)? {
				return Ok(Some(row));
			}
		}
		Ok(None)
	}
}
