// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::{EventKind, TableVar};
use relcore_store::Change;
use relcore_transaction::{
	Transition,
	interceptor::table::{TablePostUpdateContext, TablePreUpdateContext, TableProposeUpdateContext},
};
use relcore_type::{Result, Row, Value};
use tracing::instrument;

use super::prepare_new_row;
use crate::Context;

impl Context {
	/// Replaces `old` with `new` in `table`. Columns `new` does not name keep
	/// their stored values. Returns false when a handler vetoed the update.
	#[instrument(name = "engine::mutate::update", level = "debug", skip_all, fields(table = %table.name))]
	pub(crate) fn update_row(
		&mut self,
		table: &Arc<TableVar>,
		old: &Row,
		new: &Row,
		check_concurrency: bool,
	) -> Result<bool> {
		self.atomically(|ctx| {
			let old = ctx.prepare_old_row(table, old, check_concurrency)?;
			let mut new = prepare_new_row(table, new, Some(&old));

			if !ctx.before_update(table, &old, &mut new)? {
				return Ok(false);
			}
			ctx.apply_change(
				table,
				Change::Updated {
					old: old.clone(),
					new: new.clone(),
				},
			)?;
			ctx.after_update(table, &old, &new)?;
			Ok(true)
		})
	}

	fn before_update(&mut self, table: &Arc<TableVar>, old: &Row, new: &mut Row) -> Result<bool> {
		let interceptors = self.interceptors();
		interceptors.table_propose_update.execute(TableProposeUpdateContext::new(table, old, new))?;

		let mut arguments = [Value::row(old.clone()), Value::row(new.clone())];
		if !self.before_handlers(table, EventKind::BeforeUpdate, &mut arguments)? {
			return Ok(false);
		}
		let [_, written] = arguments;
		if let Some(written) = written.into_row() {
			*new = written.conform(&table.row_type);
		}

		self.validate_row(table, Some(old), new)?;
		interceptors.table_pre_update.execute(TablePreUpdateContext::new(table, old, new))?;
		self.check_row_constraints(table, Transition::Update, Some(old), Some(new))?;
		Ok(true)
	}

	fn after_update(&mut self, table: &Arc<TableVar>, old: &Row, new: &Row) -> Result<()> {
		self.after_handlers(table, EventKind::AfterUpdate, Some(old), Some(new))?;
		self.check_catalog_constraints()?;
		self.interceptors().table_post_update.execute(TablePostUpdateContext::new(table, old, new))
	}
}
