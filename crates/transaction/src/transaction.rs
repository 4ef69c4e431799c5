// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::mem;

use relcore_store::UndoEntry;
use relcore_type::{Result, error::diagnostic::transaction::no_active_transaction, return_error};
use tracing::{debug, instrument};

use crate::{
	ApplicationTransaction,
	deferred::{DeferredCheck, DeferredHandler, push_check},
};

/// One reversible effect of a statement.
#[derive(Debug)]
pub enum Undo {
	Row(UndoEntry),
	/// An operation appended to an application transaction's log.
	AppOperation(ApplicationTransaction),
}

impl Undo {
	fn apply(self) {
		match self {
			Undo::Row(entry) => entry.undo(),
			Undo::AppOperation(app) => app.pop_operation(),
		}
	}
}

/// Effects of one transaction level.
#[derive(Debug, Default)]
pub struct Transaction {
	undo: Vec<Undo>,
	checks: Vec<DeferredCheck>,
	handlers: Vec<DeferredHandler>,
}

impl Transaction {
	pub fn checks(&self) -> &[DeferredCheck] {
		&self.checks
	}

	pub fn handlers(&self) -> &[DeferredHandler] {
		&self.handlers
	}

	pub fn undo_len(&self) -> usize {
		self.undo.len()
	}

	fn merge(&mut self, child: Transaction) {
		self.undo.extend(child.undo);
		for check in child.checks {
			push_check(&mut self.checks, check);
		}
		self.handlers.extend(child.handlers);
	}

	fn rollback(self) {
		for undo in self.undo.into_iter().rev() {
			undo.apply();
		}
	}
}

/// Position in a [`TransactionStack`] that a failed statement returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savepoint {
	depth: usize,
	undo: usize,
	checks: usize,
	handlers: usize,
}

/// Nested transactions of a process.
///
/// Below the explicit levels sits an implicit level that collects the undo
/// records of statements executed outside of any transaction, so that a
/// failing statement can be undone; it is released after each statement.
#[derive(Debug, Default)]
pub struct TransactionStack {
	implicit: Transaction,
	levels: Vec<Transaction>,
}

impl TransactionStack {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn depth(&self) -> usize {
		self.levels.len()
	}

	pub fn in_transaction(&self) -> bool {
		!self.levels.is_empty()
	}

	fn current(&mut self) -> &mut Transaction {
		match self.levels.last_mut() {
			Some(level) => level,
			None => &mut self.implicit,
		}
	}

	fn current_ref(&self) -> &Transaction {
		self.levels.last().unwrap_or(&self.implicit)
	}

	pub fn begin(&mut self) {
		self.levels.push(Transaction::default());
		debug!(depth = self.levels.len(), "transaction begin");
	}

	pub fn record(&mut self, undo: Undo) {
		self.current().undo.push(undo);
	}

	pub fn defer_check(&mut self, check: DeferredCheck) {
		push_check(&mut self.current().checks, check);
	}

	pub fn defer_handler(&mut self, handler: DeferredHandler) {
		self.current().handlers.push(handler);
	}

	/// Removes the pending deferred work of the current level, for replay at
	/// commit.
	pub fn take_deferred(&mut self) -> (Vec<DeferredCheck>, Vec<DeferredHandler>) {
		let current = self.current();
		(mem::take(&mut current.checks), mem::take(&mut current.handlers))
	}

	/// Ends the current level. A nested level hands its effects to its
	/// parent; the outermost level makes them permanent.
	#[instrument(name = "transaction::commit", level = "debug", skip(self))]
	pub fn commit(&mut self) -> Result<()> {
		let Some(level) = self.levels.pop() else {
			return_error!(no_active_transaction());
		};
		match self.levels.last_mut() {
			Some(parent) => parent.merge(level),
			None => debug!(undo = level.undo_len(), "outermost transaction committed"),
		}
		Ok(())
	}

	/// Undoes and ends the current level.
	#[instrument(name = "transaction::rollback", level = "debug", skip(self))]
	pub fn rollback(&mut self) -> Result<()> {
		let Some(level) = self.levels.pop() else {
			return_error!(no_active_transaction());
		};
		level.rollback();
		Ok(())
	}

	/// Rolls back every level.
	pub fn rollback_all(&mut self) {
		while let Some(level) = self.levels.pop() {
			level.rollback();
		}
		mem::take(&mut self.implicit).rollback();
	}

	pub fn savepoint(&self) -> Savepoint {
		let current = self.current_ref();
		Savepoint {
			depth: self.levels.len(),
			undo: current.undo.len(),
			checks: current.checks.len(),
			handlers: current.handlers.len(),
		}
	}

	/// Undoes everything recorded after `savepoint`, including levels begun
	/// since.
	pub fn rollback_to(&mut self, savepoint: Savepoint) {
		while self.levels.len() > savepoint.depth {
			if let Some(level) = self.levels.pop() {
				level.rollback();
			}
		}
		let current = self.current();
		let undone = current.undo.split_off(savepoint.undo.min(current.undo.len()));
		current.checks.truncate(savepoint.checks);
		current.handlers.truncate(savepoint.handlers);
		for undo in undone.into_iter().rev() {
			undo.apply();
		}
	}

	/// Makes the implicit level's effects permanent. Called after each
	/// statement executed outside of a transaction.
	pub fn release(&mut self) {
		self.implicit = Transaction::default();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use relcore_plan::TableVar;
	use relcore_store::{Change, TableHandle, UndoEntry};
	use relcore_type::{Row, Type, Value};

	use super::{TransactionStack, Undo};

	fn fixture() -> (Arc<TableVar>, TableHandle) {
		let table = Arc::new(TableVar::builder("T").column("ID", Type::Int4).key(&["ID"]).build());
		let handle = TableHandle::new(table.clone());
		(table, handle)
	}

	fn insert(stack: &mut TransactionStack, table: &TableVar, handle: &TableHandle, id: i32) {
		let row = Row::from_values(table.row_type.clone(), vec![Value::int4(id)]);
		handle.with_mut(|d| d.insert(&row)).unwrap();
		stack.record(Undo::Row(UndoEntry::new(handle.clone(), Change::Inserted(row))));
	}

	#[test]
	fn test_nested_commit_then_outer_rollback() {
		let (table, handle) = fixture();
		let mut stack = TransactionStack::new();
		stack.begin();
		insert(&mut stack, &table, &handle, 1);
		stack.begin();
		insert(&mut stack, &table, &handle, 2);
		stack.commit().unwrap();
		assert_eq!(stack.depth(), 1);
		stack.rollback().unwrap();
		assert!(handle.is_empty());
	}

	#[test]
	fn test_rollback_to_savepoint() {
		let (table, handle) = fixture();
		let mut stack = TransactionStack::new();
		insert(&mut stack, &table, &handle, 1);
		let savepoint = stack.savepoint();
		insert(&mut stack, &table, &handle, 2);
		stack.begin();
		insert(&mut stack, &table, &handle, 3);
		stack.rollback_to(savepoint);
		assert_eq!(handle.len(), 1);
		assert!(!stack.in_transaction());
	}

	#[test]
	fn test_commit_without_transaction() {
		let mut stack = TransactionStack::new();
		assert_eq!(stack.commit().unwrap_err().code(), "TXN_001");
	}
}
