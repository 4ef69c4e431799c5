// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use indexmap::IndexMap;

use super::{Type, Value};

/// Ordered, named column layout of a row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowType {
	columns: IndexMap<String, Type>,
}

impl RowType {
	pub fn new<N: Into<String>>(columns: impl IntoIterator<Item = (N, Type)>) -> Self {
		Self {
			columns: columns.into_iter().map(|(n, t)| (n.into(), t)).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.columns.get_index_of(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.columns.contains_key(name)
	}

	pub fn name(&self, index: usize) -> Option<&str> {
		self.columns.get_index(index).map(|(n, _)| n.as_str())
	}

	pub fn column_type(&self, index: usize) -> Option<&Type> {
		self.columns.get_index(index).map(|(_, t)| t)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.columns.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
		self.columns.iter().map(|(n, t)| (n.as_str(), t))
	}

	/// Two row types are compatible when they name the same columns, in any
	/// order.
	pub fn is_compatible(&self, other: &RowType) -> bool {
		self.len() == other.len() && other.names().all(|n| self.contains(n))
	}
}

impl Display for RowType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("{")?;
		for (i, (name, ty)) in self.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}: {}", name, ty)?;
		}
		f.write_str("}")
	}
}

/// A fixed-shape tuple. Every cell is either nil or holds a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
	row_type: Arc<RowType>,
	values: Vec<Value>,
}

impl Row {
	pub fn new(row_type: Arc<RowType>) -> Self {
		let values = vec![Value::Nil; row_type.len()];
		Self {
			row_type,
			values,
		}
	}

	/// Builds a row from positional values; missing trailing values are nil,
	/// extra values are dropped.
	pub fn from_values(row_type: Arc<RowType>, mut values: Vec<Value>) -> Self {
		values.resize(row_type.len(), Value::Nil);
		Self {
			row_type,
			values,
		}
	}

	/// Builds a row from `(name, value)` pairs, inferring a row type of `Any`
	/// columns. Mostly useful for client supplied partial rows.
	pub fn from_pairs<N: Into<String>>(pairs: impl IntoIterator<Item = (N, Value)>) -> Self {
		let (names, values): (Vec<String>, Vec<Value>) = pairs.into_iter().map(|(n, v)| (n.into(), v)).unzip();
		let row_type = Arc::new(RowType::new(names.into_iter().map(|n| (n, Type::Any))));
		Self {
			row_type,
			values,
		}
	}

	pub fn row_type(&self) -> &Arc<RowType> {
		&self.row_type
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub fn into_values(self) -> Vec<Value> {
		self.values
	}

	pub fn get(&self, index: usize) -> &Value {
		&self.values[index]
	}

	pub fn get_by_name(&self, name: &str) -> Option<&Value> {
		self.row_type.index_of(name).map(|i| &self.values[i])
	}

	pub fn set(&mut self, index: usize, value: Value) {
		self.values[index] = value;
	}

	/// Sets the named column; returns false when the row has no such column.
	pub fn set_by_name(&mut self, name: &str, value: Value) -> bool {
		match self.row_type.index_of(name) {
			Some(i) => {
				self.values[i] = value;
				true
			}
			None => false,
		}
	}

	pub fn has_value(&self, index: usize) -> bool {
		!self.values[index].is_nil()
	}

	pub fn has_column(&self, name: &str) -> bool {
		self.row_type.contains(name)
	}

	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.row_type.index_of(name)
	}

	/// Merges this row into `target` by column name. Columns of `self`
	/// missing from `target` are ignored; returns the number copied.
	pub fn copy_into(&self, target: &mut Row) -> usize {
		let mut copied = 0;
		for (i, name) in self.row_type.names().enumerate() {
			if let Some(j) = target.row_type.index_of(name) {
				target.values[j] = self.values[i].clone();
				copied += 1;
			}
		}
		copied
	}

	/// Returns a row shaped like `row_type`, filled from this row by name.
	pub fn conform(&self, row_type: &Arc<RowType>) -> Row {
		if Arc::ptr_eq(&self.row_type, row_type) {
			return self.clone();
		}
		let mut result = Row::new(row_type.clone());
		self.copy_into(&mut result);
		result
	}

	/// Values of the named columns, nil for names this row does not have.
	pub fn project(&self, names: &[String]) -> Vec<Value> {
		names.iter().map(|n| self.get_by_name(n).cloned().unwrap_or(Value::Nil)).collect()
	}
}

impl Display for Row {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("row{")?;
		for (i, name) in self.row_type.names().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}: {}", name, self.values[i])?;
		}
		f.write_str("}")
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::{Row, RowType};
	use crate::value::{Type, Value};

	fn person() -> Arc<RowType> {
		Arc::new(RowType::new([("ID", Type::Int4), ("Name", Type::Utf8), ("Age", Type::Int4)]))
	}

	#[test]
	fn test_copy_into_merges_by_name() {
		let source = Row::from_pairs([("Name", Value::utf8("a")), ("Extra", Value::int4(9))]);
		let mut target = Row::new(person());
		assert_eq!(source.copy_into(&mut target), 1);
		assert_eq!(target.get_by_name("Name"), Some(&Value::utf8("a")));
		assert!(!target.has_value(0));
	}

	#[test]
	fn test_conform_divergent_shape() {
		let source = Row::from_pairs([("Age", Value::int4(3)), ("ID", Value::int4(1))]);
		let conformed = source.conform(&person());
		assert_eq!(conformed.values(), &[Value::int4(1), Value::Nil, Value::int4(3)]);
	}

	#[test]
	fn test_copy_is_independent() {
		let mut original = Row::from_values(person(), vec![Value::int4(1)]);
		let copy = original.clone();
		original.set(0, Value::int4(2));
		assert_eq!(copy.get(0), &Value::int4(1));
		assert_eq!(copy.len(), 3);
	}
}
