// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use super::{OrderedF64, RowType, Value};

/// Native type of a value or slot. Scalar types defined in the catalog map
/// onto one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
	Any,
	Boolean,
	Int4,
	Int8,
	Float8,
	Utf8,
	Row(Arc<RowType>),
	List(Box<Type>),
	Table(Arc<RowType>),
	Error,
}

impl Type {
	/// Returns true when `value` can be stored in a slot of this type without
	/// coercion loss. Nil is accepted by every type.
	pub fn accepts(&self, value: &Value) -> bool {
		match (self, value) {
			(_, Value::Nil) | (Type::Any, _) => true,
			(Type::Boolean, Value::Boolean(_)) => true,
			(Type::Int4, Value::Int4(_)) => true,
			(Type::Int8, Value::Int4(_) | Value::Int8(_)) => true,
			(Type::Float8, Value::Int4(_) | Value::Int8(_) | Value::Float8(_)) => true,
			(Type::Utf8, Value::Utf8(_)) => true,
			(Type::Row(expected), Value::Row(row)) => expected.is_compatible(row.row_type()),
			(Type::List(element), Value::List(items)) => items.iter().all(|item| element.accepts(item)),
			(Type::Table(expected), Value::Table(rows)) => {
				rows.iter().all(|row| expected.is_compatible(row.row_type()))
			}
			(Type::Error, Value::Error(_)) => true,
			_ => false,
		}
	}

	/// Converts `value` into the representation of this type, widening
	/// numerics. Returns `None` when the value is not accepted.
	pub fn coerce(&self, value: Value) -> Option<Value> {
		if !self.accepts(&value) {
			return None;
		}
		Some(match (self, value) {
			(Type::Int8, Value::Int4(v)) => Value::Int8(v as i64),
			(Type::Float8, Value::Int4(v)) => Value::Float8(OrderedF64::try_from(v as f64).ok()?),
			(Type::Float8, Value::Int8(v)) => Value::Float8(OrderedF64::try_from(v as f64).ok()?),
			(_, value) => value,
		})
	}

	pub fn is_scalar(&self) -> bool {
		matches!(self, Type::Boolean | Type::Int4 | Type::Int8 | Type::Float8 | Type::Utf8)
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Any => f.write_str("Any"),
			Type::Boolean => f.write_str("Boolean"),
			Type::Int4 => f.write_str("Int4"),
			Type::Int8 => f.write_str("Int8"),
			Type::Float8 => f.write_str("Float8"),
			Type::Utf8 => f.write_str("Utf8"),
			Type::Row(row_type) => write!(f, "row{}", row_type),
			Type::List(element) => write!(f, "list({})", element),
			Type::Table(row_type) => write!(f, "table{}", row_type),
			Type::Error => f.write_str("Error"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::Type;
	use crate::value::Value;

	#[test]
	fn test_nil_accepted_everywhere() {
		assert!(Type::Int4.accepts(&Value::Nil));
		assert!(Type::Utf8.accepts(&Value::Nil));
		assert!(Type::Error.accepts(&Value::Nil));
	}

	#[test]
	fn test_int_widening() {
		assert_eq!(Type::Int8.coerce(Value::Int4(3)), Some(Value::Int8(3)));
		assert_eq!(Type::Int4.coerce(Value::Int8(3)), None);
		assert_eq!(Type::Float8.coerce(Value::Int4(2)), Some(Value::float8(2.0)));
	}
}
