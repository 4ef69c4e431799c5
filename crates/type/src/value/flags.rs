// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use smallvec::SmallVec;

use super::Row;

/// Per-column flags recording whether a value was explicitly supplied
/// (as opposed to defaulted) during the current operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueFlags(SmallVec<[bool; 16]>);

impl ValueFlags {
	pub fn new(len: usize, initial: bool) -> Self {
		Self(SmallVec::from_elem(initial, len))
	}

	/// Flags every column of `row` that currently holds a value.
	pub fn from_row(row: &Row) -> Self {
		Self((0..row.len()).map(|i| row.has_value(i)).collect())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn get(&self, index: usize) -> bool {
		self.0.get(index).copied().unwrap_or(false)
	}

	pub fn set(&mut self, index: usize, value: bool) {
		if index >= self.0.len() {
			self.0.resize(index + 1, false);
		}
		self.0[index] = value;
	}

	pub fn any(&self) -> bool {
		self.0.iter().any(|f| *f)
	}
}

#[cfg(test)]
mod tests {
	use super::ValueFlags;
	use crate::value::{Row, Value};

	#[test]
	fn test_from_row_flags_present_cells() {
		let row = Row::from_pairs([("A", Value::int4(1)), ("B", Value::Nil)]);
		let flags = ValueFlags::from_row(&row);
		assert!(flags.get(0));
		assert!(!flags.get(1));
		assert!(!flags.get(7));
	}
}
