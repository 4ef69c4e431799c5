// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use indexmap::IndexMap;
use parking_lot::RwLock;
use relcore_plan::TableVar;
use relcore_type::{Result, error::diagnostic::catalog::table_not_found, return_error};
use tracing::debug;

use crate::{Device, TableHandle};

struct StoredTable {
	handle: TableHandle,
	device: Option<Arc<dyn Device>>,
}

/// Base table storage of a database, keyed by table name.
#[derive(Clone)]
pub struct Store(Arc<StoreInner>);

pub struct StoreInner {
	tables: RwLock<IndexMap<String, StoredTable>>,
}

impl Deref for Store {
	type Target = StoreInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Default for Store {
	fn default() -> Self {
		Self::new()
	}
}

impl Store {
	pub fn new() -> Self {
		Self(Arc::new(StoreInner {
			tables: RwLock::new(IndexMap::new()),
		}))
	}
}

impl StoreInner {
	/// Creates storage for `table`, or returns the existing handle.
	pub fn create(&self, table: Arc<TableVar>) -> TableHandle {
		let mut tables = self.tables.write();
		tables.entry(table.name.clone())
			.or_insert_with(|| StoredTable {
				handle: TableHandle::new(table),
				device: None,
			})
			.handle
			.clone()
	}

	pub fn table(&self, name: &str) -> Result<TableHandle> {
		match self.tables.read_recursive().get(name) {
			Some(stored) => Ok(stored.handle.clone()),
			None => return_error!(table_not_found(name)),
		}
	}

	pub fn handle(&self, table: &Arc<TableVar>) -> TableHandle {
		if let Some(stored) = self.tables.read_recursive().get(&table.name) {
			return stored.handle.clone();
		}
		self.create(table.clone())
	}

	/// Routes mutations of `table` through `device` first.
	pub fn attach_device(&self, table: &str, device: Arc<dyn Device>) -> Result<()> {
		let mut tables = self.tables.write();
		match tables.get_mut(table) {
			Some(stored) => {
				debug!(table, device = device.name(), "device attached");
				stored.device = Some(device);
				Ok(())
			}
			None => return_error!(table_not_found(table)),
		}
	}

	pub fn device(&self, table: &str) -> Option<Arc<dyn Device>> {
		self.tables.read_recursive().get(table).and_then(|s| s.device.clone())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use relcore_plan::TableVar;
	use relcore_type::Type;

	use super::Store;

	#[test]
	fn test_create_is_idempotent() {
		let store = Store::new();
		let table = Arc::new(TableVar::builder("T").column("ID", Type::Int4).build());
		let a = store.create(table.clone());
		let b = store.create(table);
		assert!(a.ptr_eq(&b));
		assert!(store.table("T").is_ok());
		assert_eq!(store.table("U").unwrap_err().code(), "CATALOG_001");
	}
}
