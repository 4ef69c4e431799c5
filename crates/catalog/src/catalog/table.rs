// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::TableVar;
use relcore_type::{
	Result,
	error::diagnostic::catalog::{object_already_exists, table_not_found},
	return_error,
};
use tracing::instrument;

use crate::Catalog;

impl Catalog {
	#[instrument(name = "catalog::table::create", level = "debug", skip(self, table), fields(table = %table.name))]
	pub fn create_table(&self, table: TableVar) -> Result<Arc<TableVar>> {
		self.write(|registry| {
			if registry.tables.contains_key(&table.name) {
				return_error!(object_already_exists("Table", &table.name));
			}
			let table = Arc::new(table);
			registry.tables.insert(table.name.clone(), table.clone());
			Ok(table)
		})
	}

	pub fn find_table(&self, name: &str) -> Option<Arc<TableVar>> {
		self.read(|registry| registry.tables.get(name).cloned())
	}

	pub fn table(&self, name: &str) -> Result<Arc<TableVar>> {
		match self.find_table(name) {
			Some(table) => Ok(table),
			None => return_error!(table_not_found(name)),
		}
	}

	pub fn tables(&self) -> Vec<Arc<TableVar>> {
		self.read(|registry| registry.tables.values().cloned().collect())
	}
}

#[cfg(test)]
mod tests {
	use relcore_plan::TableVar;
	use relcore_type::Type;

	use crate::Catalog;

	#[test]
	fn test_create_and_find() {
		let catalog = Catalog::new();
		catalog.create_table(TableVar::builder("T").column("ID", Type::Int4).build()).unwrap();
		assert_eq!(catalog.table("T").unwrap().name, "T");
		assert_eq!(catalog.table("U").unwrap_err().code(), "CATALOG_001");
	}

	#[test]
	fn test_duplicate_table() {
		let catalog = Catalog::new();
		catalog.create_table(TableVar::builder("T").build()).unwrap();
		let err = catalog.create_table(TableVar::builder("T").build()).unwrap_err();
		assert_eq!(err.code(), "CATALOG_004");
	}
}
