// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use parking_lot::Mutex;
use relcore_plan::TableVar;

use crate::TableData;

/// Shared handle to a table's rows. The rows are only reachable through a
/// scoped borrow, so the lock can never be forgotten or held past the
/// closure.
///
/// Never evaluate a plan inside `with`/`with_mut`: the plan may scan the
/// same table.
#[derive(Debug, Clone)]
pub struct TableHandle {
	table: Arc<TableVar>,
	data: Arc<Mutex<TableData>>,
}

impl TableHandle {
	pub fn new(table: Arc<TableVar>) -> Self {
		Self {
			data: Arc::new(Mutex::new(TableData::new(table.clone()))),
			table,
		}
	}

	pub fn table(&self) -> &Arc<TableVar> {
		&self.table
	}

	pub fn with<R>(&self, f: impl FnOnce(&TableData) -> R) -> R {
		let guard = self.data.lock();
		f(&guard)
	}

	pub fn with_mut<R>(&self, f: impl FnOnce(&mut TableData) -> R) -> R {
		let mut guard = self.data.lock();
		f(&mut guard)
	}

	pub fn scan(&self) -> Vec<relcore_type::Row> {
		self.with(TableData::scan)
	}

	pub fn len(&self) -> usize {
		self.with(TableData::len)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn ptr_eq(&self, other: &TableHandle) -> bool {
		Arc::ptr_eq(&self.data, &other.data)
	}
}
