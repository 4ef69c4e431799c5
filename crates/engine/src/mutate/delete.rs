// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::{EventKind, TableVar};
use relcore_store::Change;
use relcore_transaction::{
	Transition,
	interceptor::table::{TablePostDeleteContext, TablePreDeleteContext},
};
use relcore_type::{Result, Row, Value};
use tracing::instrument;

use crate::Context;

impl Context {
	/// Removes `old` from `table`. Returns false when a handler vetoed the
	/// delete.
	#[instrument(name = "engine::mutate::delete", level = "debug", skip_all, fields(table = %table.name))]
	pub(crate) fn delete_row(&mut self, table: &Arc<TableVar>, old: &Row, check_concurrency: bool) -> Result<bool> {
		self.atomically(|ctx| {
			let old = ctx.prepare_old_row(table, old, check_concurrency)?;
			if !ctx.before_delete(table, &old)? {
				return Ok(false);
			}
			ctx.apply_change(table, Change::Deleted(old.clone()))?;
			ctx.after_delete(table, &old)?;
			Ok(true)
		})
	}

	fn before_delete(&mut self, table: &Arc<TableVar>, old: &Row) -> Result<bool> {
		let mut arguments = [Value::row(old.clone())];
		if !self.before_handlers(table, EventKind::BeforeDelete, &mut arguments)? {
			return Ok(false);
		}
		self.interceptors().table_pre_delete.execute(TablePreDeleteContext::new(table, old))?;
		self.check_row_constraints(table, Transition::Delete, Some(old), None)?;
		Ok(true)
	}

	fn after_delete(&mut self, table: &Arc<TableVar>, old: &Row) -> Result<()> {
		self.after_handlers(table, EventKind::AfterDelete, Some(old), None)?;
		self.check_catalog_constraints()?;
		self.interceptors().table_post_delete.execute(TablePostDeleteContext::new(table, old))
	}
}
