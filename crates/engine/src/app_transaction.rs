// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Application transactions stage mutations in per-table overlays. A joined
//! process reads the overlay, which is populated from the base table the
//! first time it is read, and writes only to it. Applying replays the staged
//! operations against the base tables through the full mutation pipeline.

use std::sync::Arc;

use relcore_plan::{PlanNode, TableNode, TableVar};
use relcore_store::Change;
use relcore_transaction::{AppOperation, ApplicationTransaction};
use relcore_type::{
	Result,
	error::diagnostic::transaction::{app_transaction_already_joined, app_transaction_not_joined},
	return_error,
};
use tracing::{debug, instrument, trace};

use crate::{Context, Process, scope::GlobalContextScope};

impl Context {
	/// Merges the rows `plan` reads from the base table into the overlay of
	/// `table`.
	pub(crate) fn populate(&mut self, app: &ApplicationTransaction, table: &Arc<TableVar>, plan: &PlanNode) -> Result<()> {
		let rows = {
			let mut global = GlobalContextScope::enter(self, Some(app));
			global.rows_of(plan)?
		};
		let merged = app.merge(table, rows);
		trace!(app = %app.id(), table = %table.name, merged, "populated overlay");
		Ok(())
	}

	pub(crate) fn populate_table(&mut self, app: &ApplicationTransaction, table: &Arc<TableVar>) -> Result<()> {
		let plan = PlanNode::Table(TableNode::base(table.clone()));
		self.populate(app, table, &plan)
	}

	fn replay(&mut self, operation: &AppOperation) -> Result<()> {
		let table = &operation.table;
		match &operation.change {
			Change::Inserted(row) => self.insert_row(table, row)?,
			Change::Updated {
				old,
				new,
			} => self.update_row(table, old, new, false)?,
			Change::Deleted(row) => self.delete_row(table, row, false)?,
		};
		Ok(())
	}
}

impl Process {
	/// Joins `app`. Statements of this process then run in its global
	/// context until the process leaves.
	pub fn join(&mut self, app: &ApplicationTransaction) -> Result<()> {
		if let Some(current) = &self.ctx.app {
			return_error!(app_transaction_already_joined(&current.id().to_string()));
		}
		app.join()?;
		debug!(app = %app.id(), user = %self.ctx.user.name, "joined application transaction");
		self.ctx.app = Some(app.clone());
		Ok(())
	}

	pub fn leave(&mut self) -> Result<()> {
		let Some(app) = self.ctx.app.take() else {
			return_error!(app_transaction_not_joined());
		};
		app.leave();
		debug!(app = %app.id(), "left application transaction");
		Ok(())
	}

	pub fn is_joined(&self) -> bool {
		self.ctx.app.is_some()
	}

	/// Closes `app` and replays its staged operations against the base
	/// tables in one transaction.
	#[instrument(name = "engine::app::apply", level = "debug", skip_all, fields(app = %app.id()))]
	pub fn apply(&mut self, app: &ApplicationTransaction) -> Result<()> {
		self.leave_if_joined(app);
		let operations = app.close()?;
		debug!(operations = operations.len(), "replaying staged operations");

		self.begin();
		let replayed = operations.iter().try_for_each(|operation| self.statement(|ctx| ctx.replay(operation)));
		match replayed {
			Ok(()) => self.commit(),
			Err(err) => {
				self.rollback()?;
				Err(err)
			}
		}
	}

	/// Closes `app` without touching the base tables.
	pub fn discard(&mut self, app: &ApplicationTransaction) -> Result<()> {
		self.leave_if_joined(app);
		let operations = app.close()?;
		debug!(app = %app.id(), discarded = operations.len(), "application transaction discarded");
		Ok(())
	}

	fn leave_if_joined(&mut self, app: &ApplicationTransaction) {
		if self.ctx.app.as_ref().is_some_and(|current| current.id() == app.id()) {
			if let Some(app) = self.ctx.app.take() {
				app.leave();
			}
		}
	}
}
