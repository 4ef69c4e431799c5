// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::{EventHandler, EventKind, TableVar};
use relcore_transaction::DeferredHandler;
use relcore_type::{Result, Row, Value};
use tracing::{debug, trace};

use crate::Context;

/// Handler arguments for a row event: `[new]` for inserts, `[old, new]` for
/// updates and `[old]` for deletes.
pub(super) fn event_arguments(old: Option<&Row>, new: Option<&Row>) -> Vec<Value> {
	old.into_iter().chain(new).map(|row| Value::row(row.clone())).collect()
}

impl Context {
	/// Calls the operator of `handler` with as many of `arguments` as it
	/// declares operands for.
	pub(super) fn invoke_handler(&mut self, handler: &EventHandler, arguments: &mut [Value]) -> Result<Value> {
		trace!(handler = %handler.name, kind = %handler.kind, "invoke handler");
		let count = handler.operator.operands.len().min(arguments.len());
		self.invoke(&handler.operator, &mut arguments[..count], &[])
	}

	/// Runs the before handlers of `kind`. A handler returning false vetoes
	/// the mutation and stops the chain. Var operands update `arguments`.
	pub(super) fn before_handlers(&mut self, table: &TableVar, kind: EventKind, arguments: &mut [Value]) -> Result<bool> {
		for handler in table.handlers.get(kind) {
			if let Value::Boolean(false) = self.invoke_handler(handler, arguments)? {
				debug!(table = %table.name, handler = %handler.name, %kind, "mutation vetoed");
				return Ok(false);
			}
		}
		Ok(true)
	}

	/// Runs the after handlers of `kind`. Deferred handlers wait for commit
	/// while a transaction is open.
	pub(super) fn after_handlers(
		&mut self,
		table: &Arc<TableVar>,
		kind: EventKind,
		old: Option<&Row>,
		new: Option<&Row>,
	) -> Result<()> {
		for handler in table.handlers.get(kind) {
			if handler.is_deferred && self.transactions.in_transaction() {
				trace!(table = %table.name, handler = %handler.name, "handler deferred");
				self.transactions.defer_handler(DeferredHandler {
					table: table.clone(),
					handler: handler.clone(),
					old: old.cloned(),
					new: new.cloned(),
				});
				continue;
			}
			let mut arguments = event_arguments(old, new);
			self.invoke_handler(handler, &mut arguments)?;
		}
		Ok(())
	}

	pub(crate) fn run_deferred_handler(&mut self, deferred: &DeferredHandler) -> Result<()> {
		let mut arguments = event_arguments(deferred.old.as_ref(), deferred.new.as_ref());
		self.invoke_handler(&deferred.handler, &mut arguments)?;
		Ok(())
	}
}
