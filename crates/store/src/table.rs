// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	collections::BTreeMap,
	fmt::{Display, Formatter},
	sync::Arc,
};

use relcore_plan::TableVar;
use relcore_type::{
	Result, Row, Value,
	error::diagnostic::{concurrency::row_not_found, constraint::key_violation},
	return_error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub u64);

impl Display for RowId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Generic in-memory representation of a table's rows.
///
/// Rows are addressed by their identity columns (see
/// [`TableVar::identity_columns`]); the [`RowId`] is an internal insertion
/// handle only.
#[derive(Debug)]
pub struct TableData {
	table: Arc<TableVar>,
	rows: BTreeMap<RowId, Row>,
	next_id: u64,
}

impl TableData {
	pub fn new(table: Arc<TableVar>) -> Self {
		Self {
			table,
			rows: BTreeMap::new(),
			next_id: 0,
		}
	}

	pub fn table(&self) -> &Arc<TableVar> {
		&self.table
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// All rows, sorted by the table's scan order.
	pub fn scan(&self) -> Vec<Row> {
		let mut rows: Vec<Row> = self.rows.values().cloned().collect();
		if let Some(order) = self.table.scan_order() {
			let indexes: Vec<(usize, bool)> = order
				.columns
				.iter()
				.filter_map(|c| self.table.column_index(&c.column).map(|i| (i, c.ascending)))
				.collect();
			rows.sort_by(|l, r| {
				for (i, ascending) in &indexes {
					let ordering = l.get(*i).sort_cmp(r.get(*i));
					let ordering = if *ascending {
						ordering
					} else {
						ordering.reverse()
					};
					if ordering != Ordering::Equal {
						return ordering;
					}
				}
				Ordering::Equal
			});
		}
		rows
	}

	/// The stored row with the same identity as `row`.
	pub fn find(&self, row: &Row) -> Option<&Row> {
		self.locate(row).and_then(|id| self.rows.get(&id))
	}

	fn locate(&self, row: &Row) -> Option<RowId> {
		let identity = self.table.identity_columns();
		let key = row.project(&identity);
		self.rows.iter().find(|(_, stored)| same_values(&stored.project(&identity), &key)).map(|(id, _)| *id)
	}

	/// Inserts `row` after enforcing every key of the table.
	pub fn insert(&mut self, row: &Row) -> Result<RowId> {
		let row = row.conform(&self.table.row_type);
		self.check_keys(&row, None)?;
		Ok(self.push(row))
	}

	/// Replaces the stored row identified by `old` with `new`.
	pub fn update(&mut self, old: &Row, new: &Row) -> Result<()> {
		let Some(id) = self.locate(old) else {
			return_error!(row_not_found(&self.table.name));
		};
		let new = new.conform(&self.table.row_type);
		self.check_keys(&new, Some(id))?;
		self.rows.insert(id, new);
		Ok(())
	}

	/// Removes the stored row identified by `old`.
	pub fn delete(&mut self, old: &Row) -> Result<()> {
		let Some(id) = self.locate(old) else {
			return_error!(row_not_found(&self.table.name));
		};
		self.rows.remove(&id);
		Ok(())
	}

	/// Puts `row` back without key enforcement. Used by undo and overlay
	/// population.
	pub fn restore(&mut self, row: Row) {
		self.push(row);
	}

	/// Removes the row identified by `row` if present. Used by undo.
	pub fn remove(&mut self, row: &Row) {
		if let Some(id) = self.locate(row) {
			self.rows.remove(&id);
		}
	}

	/// Replaces the row identified by `current` with `previous`, or puts
	/// `previous` back when nothing matches. Used by undo.
	pub fn revert(&mut self, current: &Row, previous: Row) {
		match self.locate(current) {
			Some(id) => {
				self.rows.insert(id, previous);
			}
			None => self.restore(previous),
		}
	}

	pub fn clear(&mut self) {
		self.rows.clear();
	}

	fn push(&mut self, row: Row) -> RowId {
		let id = RowId(self.next_id);
		self.next_id += 1;
		self.rows.insert(id, row);
		id
	}

	fn check_keys(&self, row: &Row, exclude: Option<RowId>) -> Result<()> {
		for key in &self.table.keys {
			let values = row.project(&key.columns);
			if key.is_sparse && values.iter().any(Value::is_nil) {
				continue;
			}
			let duplicate = self
				.rows
				.iter()
				.filter(|(id, _)| Some(**id) != exclude)
				.any(|(_, stored)| same_values(&stored.project(&key.columns), &values));
			if duplicate {
				return_error!(key_violation(&self.table.name, &key.columns));
			}
		}
		Ok(())
	}
}

fn same_values(left: &[Value], right: &[Value]) -> bool {
	left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.same(r))
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use relcore_plan::{Order, TableVar};
	use relcore_type::{Row, Type, Value};

	use super::TableData;

	fn people() -> Arc<TableVar> {
		Arc::new(
			TableVar::builder("People")
				.column("ID", Type::Int4)
				.nilable_column("Email", Type::Utf8)
				.key(&["ID"])
				.sparse_key(&["Email"])
				.order(Order {
					columns: vec![relcore_plan::OrderColumn {
						column: "ID".to_string(),
						ascending: false,
					}],
				})
				.build(),
		)
	}

	fn row(table: &TableVar, id: i32, email: Option<&str>) -> Row {
		Row::from_values(table.row_type.clone(), vec![Value::int4(id), Value::from(email)])
	}

	#[test]
	fn test_key_violation() {
		let table = people();
		let mut data = TableData::new(table.clone());
		data.insert(&row(&table, 1, None)).unwrap();
		let err = data.insert(&row(&table, 1, Some("x"))).unwrap_err();
		assert_eq!(err.code(), "CONSTRAINT_004");
		assert_eq!(data.len(), 1);
	}

	#[test]
	fn test_sparse_key_ignores_nil() {
		let table = people();
		let mut data = TableData::new(table.clone());
		data.insert(&row(&table, 1, None)).unwrap();
		data.insert(&row(&table, 2, None)).unwrap();
		data.insert(&row(&table, 3, Some("a"))).unwrap();
		assert!(data.insert(&row(&table, 4, Some("a"))).is_err());
		assert_eq!(data.len(), 3);
	}

	#[test]
	fn test_scan_uses_first_order() {
		let table = people();
		let mut data = TableData::new(table.clone());
		for id in [2, 3, 1] {
			data.insert(&row(&table, id, None)).unwrap();
		}
		let ids: Vec<_> = data.scan().iter().map(|r| r.get(0).as_i64().unwrap()).collect();
		assert_eq!(ids, vec![3, 2, 1]);
	}

	#[test]
	fn test_update_missing_row() {
		let table = people();
		let mut data = TableData::new(table.clone());
		let err = data.update(&row(&table, 9, None), &row(&table, 9, Some("b"))).unwrap_err();
		assert_eq!(err.code(), "CONCURRENCY_001");
	}

	#[test]
	fn test_update_excludes_self_from_key_check() {
		let table = people();
		let mut data = TableData::new(table.clone());
		data.insert(&row(&table, 1, Some("a"))).unwrap();
		data.update(&row(&table, 1, Some("a")), &row(&table, 1, Some("b"))).unwrap();
		assert_eq!(data.find(&row(&table, 1, None)).unwrap().get(1), &Value::utf8("b"));
	}
}
