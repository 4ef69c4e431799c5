// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{sync::Arc, thread, time::Duration};

use crossbeam_channel::{RecvTimeoutError, bounded};
use relcore_catalog::User;
use relcore_plan::PlanNode;
use relcore_type::{
	Error, Result, Row, Value,
	error::diagnostic::{
		internal::{stack_imbalance, unmatched_signal},
		runtime::{operation_aborted, timeout},
		transaction::{deferred_check_failed, no_active_transaction},
	},
	return_error,
};
use tracing::{debug, instrument, warn};

use crate::{
	AbortHandle, Context, Outcome,
	database::Services,
	scope::{FrameScope, GlobalContextScope},
};

/// A session executing plans against a database. Each call on a process is
/// one statement: it either completes or leaves no trace, and runs in the
/// joined application transaction's global context.
pub struct Process {
	pub(crate) ctx: Context,
}

impl Process {
	pub(crate) fn new(services: Arc<Services>, user: User) -> Self {
		Self {
			ctx: Context::new(services, user),
		}
	}

	pub fn user(&self) -> &User {
		&self.ctx.user
	}

	/// Handle that aborts whatever this process is executing.
	pub fn abort_handle(&self) -> AbortHandle {
		self.ctx.abort.clone()
	}

	pub fn stack_depth(&self) -> usize {
		self.ctx.stack.len()
	}

	pub fn transaction_depth(&self) -> usize {
		self.ctx.transactions.depth()
	}

	/// Runs `f` as one statement: in its own frame, inside the joined
	/// application transaction's global context, undone when it fails.
	pub(crate) fn statement<R>(&mut self, f: impl FnOnce(&mut Context) -> Result<R>) -> Result<R> {
		let depth = self.ctx.stack.len();
		let savepoint = self.ctx.transactions.savepoint();
		let app = self.ctx.app.clone();
		let result = {
			let mut global = GlobalContextScope::enter(&mut self.ctx, app.as_ref());
			let mut frame = FrameScope::push(&mut global);
			f(&mut *frame)
		};
		if result.is_err() {
			self.ctx.transactions.rollback_to(savepoint);
		}
		if !self.ctx.transactions.in_transaction() {
			self.ctx.transactions.release();
		}
		if self.ctx.stack.len() != depth {
			let mut imbalance = stack_imbalance(depth, self.ctx.stack.len());
			if let Err(err) = result {
				warn!(code = err.code(), "statement failed with an unbalanced stack");
				imbalance.cause = Some(Box::new(err.0));
			}
			return Err(Error(imbalance));
		}
		result
	}

	#[instrument(name = "engine::process::execute", level = "debug", skip_all)]
	pub fn execute(&mut self, plan: &PlanNode) -> Result<()> {
		self.statement(|ctx| match ctx.execute(plan)? {
			Outcome::Normal => Ok(()),
			signal => return_error!(unmatched_signal(&signal.to_string())),
		})
	}

	pub fn evaluate(&mut self, plan: &PlanNode) -> Result<Value> {
		self.statement(|ctx| ctx.evaluate(plan))
	}

	/// Calls the named operator. Entries of `arguments` for var and out
	/// operands receive their final values.
	#[instrument(name = "engine::process::call", level = "debug", skip(self, arguments))]
	pub fn call(&mut self, operator: &str, arguments: &mut [Value]) -> Result<Value> {
		let operator = self.ctx.catalog().operator(operator)?;
		self.statement(|ctx| ctx.invoke(&operator, arguments, &[]))
	}

	/// Executes `plan`, aborting it once `limit` (or the configured default)
	/// has elapsed.
	pub fn execute_with_timeout(&mut self, plan: &PlanNode, limit: Option<Duration>) -> Result<()> {
		let Some(limit) = limit.or(self.ctx.config().default_timeout) else {
			return self.execute(plan);
		};
		let (done, finished) = bounded::<()>(1);
		let abort = self.ctx.abort.clone();
		let watchdog = thread::spawn(move || match finished.recv_timeout(limit) {
			Err(RecvTimeoutError::Timeout) => {
				abort.abort();
				true
			}
			_ => false,
		});

		let result = self.execute(plan);
		drop(done);
		let timed_out = watchdog.join().unwrap_or(false);
		if !timed_out {
			return result;
		}
		self.ctx.abort.reset();
		match result {
			Err(err) if err.code() == operation_aborted().code => {
				warn!(limit_ms = limit.as_millis() as u64, "statement timed out");
				Err(Error(timeout(limit.as_millis())))
			}
			other => other,
		}
	}

	pub fn begin(&mut self) {
		self.ctx.transactions.begin();
		debug!(depth = self.ctx.transactions.depth(), "begin");
	}

	/// Commits the innermost transaction. Committing the outermost one first
	/// runs every deferred check and handler; if any fails, the transaction is
	/// rolled back instead.
	#[instrument(name = "engine::process::commit", level = "debug", skip_all)]
	pub fn commit(&mut self) -> Result<()> {
		if !self.ctx.transactions.in_transaction() {
			return_error!(no_active_transaction());
		}
		if self.ctx.transactions.depth() == 1 {
			let deferred = self.statement(|ctx| ctx.run_deferred());
			if let Err(cause) = deferred {
				warn!(code = cause.code(), "deferred check failed, rolling back");
				self.ctx.transactions.rollback()?;
				return Err(Error(deferred_check_failed(cause.0)));
			}
		}
		self.ctx.transactions.commit()
	}

	pub fn rollback(&mut self) -> Result<()> {
		debug!(depth = self.ctx.transactions.depth(), "rollback");
		self.ctx.transactions.rollback()
	}

	pub fn in_transaction(&self) -> bool {
		self.ctx.transactions.in_transaction()
	}

	/// Inserts `row` into the named table. Returns false when a handler
	/// vetoed the insert.
	pub fn insert(&mut self, table: &str, row: &Row) -> Result<bool> {
		let table = self.ctx.catalog().table(table)?;
		self.statement(|ctx| ctx.insert_row(&table, row))
	}

	/// Updates `old` to `new` with the configured concurrency checking.
	pub fn update(&mut self, table: &str, old: &Row, new: &Row) -> Result<bool> {
		let check_concurrency = self.ctx.config().check_concurrency;
		self.update_checked(table, old, new, check_concurrency)
	}

	pub fn update_checked(&mut self, table: &str, old: &Row, new: &Row, check_concurrency: bool) -> Result<bool> {
		let table = self.ctx.catalog().table(table)?;
		self.statement(|ctx| ctx.update_row(&table, old, new, check_concurrency))
	}

	pub fn delete(&mut self, table: &str, old: &Row) -> Result<bool> {
		let check_concurrency = self.ctx.config().check_concurrency;
		self.delete_checked(table, old, check_concurrency)
	}

	pub fn delete_checked(&mut self, table: &str, old: &Row, check_concurrency: bool) -> Result<bool> {
		let table = self.ctx.catalog().table(table)?;
		self.statement(|ctx| ctx.delete_row(&table, old, check_concurrency))
	}
}

impl Drop for Process {
	fn drop(&mut self) {
		if self.ctx.transactions.in_transaction() {
			debug!(depth = self.ctx.transactions.depth(), "process dropped inside a transaction, rolling back");
			self.ctx.transactions.rollback_all();
		}
		if let Some(app) = self.ctx.app.take() {
			app.leave();
		}
	}
}

#[cfg(test)]
mod tests {
	use relcore_type::{Error, Type, Value, error::diagnostic::internal::internal};

	use crate::{
		stack::Symbol,
		test_utils::{create_test_database, create_test_process},
	};

	#[test]
	fn test_stack_imbalance_keeps_failure_as_cause() {
		let database = create_test_database();
		let mut process = create_test_process(&database);
		let empty = process.ctx.stack.mark();
		process.ctx.stack.push(Symbol::new("outer", Type::Int4, Value::int4(1))).unwrap();

		let err = process
			.statement(|ctx| -> relcore_type::Result<()> {
				ctx.stack.truncate(empty);
				Err(Error(internal("statement failed")))
			})
			.unwrap_err();
		assert_eq!(err.code(), "INTERNAL_004");
		assert_eq!(err.cause().map(|cause| cause.code().to_string()).as_deref(), Some("INTERNAL_001"));
	}
}
