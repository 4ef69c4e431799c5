// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::{EventKind, TableVar};
use relcore_store::Change;
use relcore_transaction::{
	Transition,
	interceptor::table::{TablePostInsertContext, TablePreInsertContext, TableProposeInsertContext},
};
use relcore_type::{Result, Row, Value, ValueFlags};
use tracing::instrument;

use super::{prepare_new_row, protocol::Protocol};
use crate::{Context, scope::InsertModeScope};

impl Context {
	/// Inserts `row` into `table`. Columns the row does not name are
	/// defaulted. Returns false when a handler vetoed the insert.
	#[instrument(name = "engine::mutate::insert", level = "debug", skip_all, fields(table = %table.name))]
	pub(crate) fn insert_row(&mut self, table: &Arc<TableVar>, row: &Row) -> Result<bool> {
		self.atomically(|ctx| {
			let mut ctx = InsertModeScope::set(ctx, true);
			let mut new = prepare_new_row(table, row, None);
			let supplied = supplied_flags(table, row);

			if !ctx.before_insert(table, &mut new, &supplied)? {
				return Ok(false);
			}
			ctx.apply_change(table, Change::Inserted(new.clone()))?;
			ctx.after_insert(table, &new)?;
			Ok(true)
		})
	}

	fn before_insert(&mut self, table: &Arc<TableVar>, new: &mut Row, supplied: &ValueFlags) -> Result<bool> {
		let interceptors = self.interceptors();
		interceptors.table_propose_insert.execute(TableProposeInsertContext::new(table, new))?;

		for index in 0..table.columns.len() {
			if !supplied.get(index) && !new.has_value(index) {
				self.run_protocol(Protocol::Default, table, index, new)?;
			}
		}

		let mut arguments = [Value::row(new.clone())];
		if !self.before_handlers(table, EventKind::BeforeInsert, &mut arguments)? {
			return Ok(false);
		}
		let [written] = arguments;
		if let Some(written) = written.into_row() {
			*new = written.conform(&table.row_type);
		}

		self.validate_row(table, None, new)?;
		interceptors.table_pre_insert.execute(TablePreInsertContext::new(table, new))?;
		self.check_row_constraints(table, Transition::Insert, None, Some(new))?;
		Ok(true)
	}

	fn after_insert(&mut self, table: &Arc<TableVar>, new: &Row) -> Result<()> {
		self.after_handlers(table, EventKind::AfterInsert, None, Some(new))?;
		self.check_catalog_constraints()?;
		self.interceptors().table_post_insert.execute(TablePostInsertContext::new(table, new))
	}
}

/// Columns the caller named, including those it explicitly set to nil.
fn supplied_flags(table: &TableVar, row: &Row) -> ValueFlags {
	let mut flags = ValueFlags::new(table.columns.len(), false);
	for (index, column) in table.columns.iter().enumerate() {
		if row.has_column(&column.name) {
			flags.set(index, true);
		}
	}
	flags
}
