// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_type::Row;
use tracing::trace;

use crate::TableHandle;

/// A physical change applied to a table.
#[derive(Debug, Clone)]
pub enum Change {
	Inserted(Row),
	Updated {
		old: Row,
		new: Row,
	},
	Deleted(Row),
}

/// Record sufficient to reverse one physical change.
#[derive(Debug, Clone)]
pub struct UndoEntry {
	pub table: TableHandle,
	pub change: Change,
}

impl UndoEntry {
	pub fn new(table: TableHandle, change: Change) -> Self {
		Self {
			table,
			change,
		}
	}

	pub fn undo(self) {
		trace!(table = %self.table.table().name, "undo");
		let UndoEntry {
			table,
			change,
		} = self;
		table.with_mut(|data| match change {
			Change::Inserted(row) => data.remove(&row),
			Change::Updated {
				old,
				new,
			} => data.revert(&new, old),
			Change::Deleted(row) => data.restore(row),
		});
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use relcore_plan::TableVar;
	use relcore_type::{Row, Type, Value};

	use super::{Change, UndoEntry};
	use crate::TableHandle;

	#[test]
	fn test_undo_reverses_in_reverse_order() {
		let table = Arc::new(
			TableVar::builder("T")
				.column("ID", Type::Int4)
				.nilable_column("Name", Type::Utf8)
				.key(&["ID"])
				.build(),
		);
		let handle = TableHandle::new(table.clone());
		let a = Row::from_values(table.row_type.clone(), vec![Value::int4(1), Value::utf8("a")]);
		let b = Row::from_values(table.row_type.clone(), vec![Value::int4(1), Value::utf8("b")]);

		let mut log = Vec::new();
		handle.with_mut(|d| d.insert(&a)).unwrap();
		log.push(UndoEntry::new(handle.clone(), Change::Inserted(a.clone())));
		handle.with_mut(|d| d.update(&a, &b)).unwrap();
		log.push(UndoEntry::new(handle.clone(), Change::Updated {
			old: a.clone(),
			new: b.clone(),
		}));

		for entry in log.into_iter().rev() {
			entry.undo();
		}
		assert!(handle.is_empty());
	}
}
