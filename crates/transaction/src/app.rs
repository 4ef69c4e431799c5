// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Application transactions: isolated overlays of staged rows, layered on
//! top of the base tables until they are applied or discarded.

use std::{
	cell::RefCell,
	collections::HashMap,
	fmt::{Debug, Display, Formatter},
	sync::Arc,
};

use indexmap::IndexMap;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use relcore_plan::TableVar;
use relcore_store::{Change, TableHandle};
use relcore_type::{Result, Row, Value, error::diagnostic::transaction::app_transaction_closed, return_error};
use tracing::{debug, trace};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppTransactionId(Uuid);

impl AppTransactionId {
	pub fn generate() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Display for AppTransactionId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

/// A staged mutation, replayed against the base tables on apply.
#[derive(Debug, Clone)]
pub struct AppOperation {
	pub table: Arc<TableVar>,
	pub change: Change,
}

#[derive(Default)]
struct AppState {
	tables: IndexMap<String, TableHandle>,
	/// Identity values of rows deleted in the overlay, per table, so that
	/// merging base rows does not bring them back.
	deleted: HashMap<String, Vec<Vec<Value>>>,
	operations: Vec<AppOperation>,
	/// The table's deleted identities before each staged operation.
	deleted_before: Vec<Vec<Vec<Value>>>,
	participants: usize,
	closed: bool,
}

/// Shared handle to an application transaction.
///
/// Every access goes through a re-entrant lock: a thread that has entered
/// the transaction's global context (see [`ApplicationTransaction::enter`])
/// may keep accessing it, while other threads wait until it leaves.
#[derive(Clone)]
pub struct ApplicationTransaction {
	id: AppTransactionId,
	state: Arc<ReentrantMutex<RefCell<AppState>>>,
}

/// Held while a process executes within the transaction's global context.
pub struct AppGuard<'a> {
	_guard: ReentrantMutexGuard<'a, RefCell<AppState>>,
}

impl ApplicationTransaction {
	pub fn new() -> Self {
		Self {
			id: AppTransactionId::generate(),
			state: Arc::new(ReentrantMutex::new(RefCell::new(AppState::default()))),
		}
	}

	pub fn id(&self) -> AppTransactionId {
		self.id
	}

	fn with_state<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
		let guard = self.state.lock();
		let mut state = guard.borrow_mut();
		f(&mut state)
	}

	/// Enters the global context. Re-entrant on the same thread.
	pub fn enter(&self) -> AppGuard<'_> {
		trace!(app = %self.id, "enter global context");
		AppGuard {
			_guard: self.state.lock(),
		}
	}

	pub fn is_closed(&self) -> bool {
		self.with_state(|s| s.closed)
	}

	pub fn join(&self) -> Result<()> {
		self.with_state(|s| {
			if s.closed {
				return_error!(app_transaction_closed(&self.id.to_string()));
			}
			s.participants += 1;
			Ok(())
		})
	}

	pub fn leave(&self) {
		self.with_state(|s| s.participants = s.participants.saturating_sub(1));
	}

	pub fn participants(&self) -> usize {
		self.with_state(|s| s.participants)
	}

	/// The overlay table for `table`, created empty on first use.
	pub fn overlay(&self, table: &Arc<TableVar>) -> TableHandle {
		self.with_state(|s| {
			s.tables.entry(table.name.clone()).or_insert_with(|| TableHandle::new(table.clone())).clone()
		})
	}

	/// Adds the base rows not yet present in the overlay and not deleted in
	/// it. Returns the number of rows added.
	pub fn merge(&self, table: &Arc<TableVar>, base_rows: Vec<Row>) -> usize {
		let overlay = self.overlay(table);
		let identity = table.identity_columns();
		let deleted = self.with_state(|s| s.deleted.get(&table.name).cloned().unwrap_or_default());
		let merged = overlay.with_mut(|data| {
			let mut merged = 0;
			for row in base_rows {
				let key = row.project(&identity);
				if deleted.iter().any(|d| same(d, &key)) || data.find(&row).is_some() {
					continue;
				}
				data.restore(row);
				merged += 1;
			}
			merged
		});
		trace!(app = %self.id, table = %table.name, merged, "merged base rows");
		merged
	}

	/// Records a staged mutation of an overlay table. An update that changes
	/// the identity removes the old identity from the overlay.
	pub fn record(&self, table: &Arc<TableVar>, change: Change) {
		let identity = table.identity_columns();
		self.with_state(|s| {
			let deleted = s.deleted.entry(table.name.clone()).or_default();
			s.deleted_before.push(deleted.clone());
			let (removed, added) = match &change {
				Change::Deleted(row) => (Some(row.project(&identity)), None),
				Change::Inserted(row) => (None, Some(row.project(&identity))),
				Change::Updated {
					old,
					new,
				} => {
					let (old, new) = (old.project(&identity), new.project(&identity));
					if same(&old, &new) {
						(None, None)
					} else {
						(Some(old), Some(new))
					}
				}
			};
			if let Some(key) = added {
				deleted.retain(|d| !same(d, &key));
			}
			if let Some(key) = removed {
				deleted.push(key);
			}
			s.operations.push(AppOperation {
				table: table.clone(),
				change,
			});
		});
	}

	/// Forgets the most recently staged mutation. Used when the statement
	/// that staged it is undone.
	pub fn pop_operation(&self) {
		self.with_state(|s| {
			let Some(operation) = s.operations.pop() else {
				return;
			};
			if let Some(deleted) = s.deleted_before.pop() {
				s.deleted.insert(operation.table.name.clone(), deleted);
			}
		});
	}

	pub fn operations(&self) -> Vec<AppOperation> {
		self.with_state(|s| s.operations.clone())
	}

	/// Closes the transaction and hands back the staged operations for
	/// replay against the base tables.
	pub fn close(&self) -> Result<Vec<AppOperation>> {
		self.with_state(|s| {
			if s.closed {
				return_error!(app_transaction_closed(&self.id.to_string()));
			}
			s.closed = true;
			s.tables.clear();
			s.deleted.clear();
			s.deleted_before.clear();
			debug!(app = %self.id, operations = s.operations.len(), "application transaction closed");
			Ok(std::mem::take(&mut s.operations))
		})
	}
}

impl Default for ApplicationTransaction {
	fn default() -> Self {
		Self::new()
	}
}

impl Debug for ApplicationTransaction {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ApplicationTransaction").field("id", &self.id).finish()
	}
}

fn same(left: &[Value], right: &[Value]) -> bool {
	left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.same(r))
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use relcore_plan::TableVar;
	use relcore_store::Change;
	use relcore_type::{Row, Type, Value};

	use super::ApplicationTransaction;

	fn table() -> Arc<TableVar> {
		Arc::new(
			TableVar::builder("T")
				.column("ID", Type::Int4)
				.nilable_column("Name", Type::Utf8)
				.key(&["ID"])
				.build(),
		)
	}

	fn row(table: &TableVar, id: i32, name: &str) -> Row {
		Row::from_values(table.row_type.clone(), vec![Value::int4(id), Value::utf8(name)])
	}

	#[test]
	fn test_merge_skips_present_and_deleted() {
		let t = table();
		let app = ApplicationTransaction::new();
		app.overlay(&t).with_mut(|d| d.insert(&row(&t, 1, "staged"))).unwrap();
		app.record(&t, Change::Deleted(row(&t, 2, "b")));

		let merged = app.merge(&t, vec![row(&t, 1, "base"), row(&t, 2, "b"), row(&t, 3, "c")]);
		assert_eq!(merged, 1);

		let rows = app.overlay(&t).scan();
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].get(1), &Value::utf8("staged"));
	}

	#[test]
	fn test_key_change_hides_old_identity() {
		let t = table();
		let app = ApplicationTransaction::new();
		app.overlay(&t).with_mut(|d| d.insert(&row(&t, 2, "a"))).unwrap();
		app.record(
			&t,
			Change::Updated {
				old: row(&t, 1, "a"),
				new: row(&t, 2, "a"),
			},
		);

		assert_eq!(app.merge(&t, vec![row(&t, 1, "a")]), 0);
		assert_eq!(app.overlay(&t).scan().len(), 1);
	}

	#[test]
	fn test_pop_operation_restores_deleted() {
		let t = table();
		let app = ApplicationTransaction::new();
		app.record(&t, Change::Deleted(row(&t, 1, "a")));
		app.record(&t, Change::Inserted(row(&t, 1, "b")));
		app.pop_operation();

		assert_eq!(app.operations().len(), 1);
		assert_eq!(app.merge(&t, vec![row(&t, 1, "a")]), 0);
		assert!(app.overlay(&t).scan().is_empty());
	}

	#[test]
	fn test_enter_is_reentrant() {
		let app = ApplicationTransaction::new();
		let _outer = app.enter();
		let _inner = app.enter();
		app.join().unwrap();
		assert_eq!(app.participants(), 1);
	}

	#[test]
	fn test_close_twice() {
		let app = ApplicationTransaction::new();
		assert!(app.close().unwrap().is_empty());
		assert_eq!(app.close().unwrap_err().code(), "TXN_005");
		assert!(app.join().is_err());
	}
}
