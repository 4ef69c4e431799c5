// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use super::Value;

impl Value {
	/// Three-valued equality: `None` when either side is nil.
	pub fn equals(&self, other: &Value) -> Option<bool> {
		if self.is_nil() || other.is_nil() {
			return None;
		}
		Some(self.same(other))
	}

	/// Two-valued equality where nil equals only nil. Numerics compare across
	/// widths, rows compare column by column regardless of column order.
	pub fn same(&self, other: &Value) -> bool {
		match (self, other) {
			(Value::Nil, Value::Nil) => true,
			(Value::Nil, _) | (_, Value::Nil) => false,
			(Value::Boolean(l), Value::Boolean(r)) => l == r,
			(Value::Utf8(l), Value::Utf8(r)) => l == r,
			(Value::Float8(_), _) | (_, Value::Float8(_)) => match (self.as_f64(), other.as_f64()) {
				(Some(l), Some(r)) => l == r,
				_ => false,
			},
			(Value::Int4(_) | Value::Int8(_), Value::Int4(_) | Value::Int8(_)) => self.as_i64() == other.as_i64(),
			(Value::Row(l), Value::Row(r)) => {
				l.len() == r.len()
					&& l.row_type().names().enumerate().all(|(i, name)| {
						r.get_by_name(name).map(|v| l.get(i).same(v)).unwrap_or(false)
					})
			}
			(Value::List(l), Value::List(r)) => l.len() == r.len() && l.iter().zip(r).all(|(a, b)| a.same(b)),
			(Value::Table(l), Value::Table(r)) => l == r,
			(Value::Error(l), Value::Error(r)) => l == r,
			_ => false,
		}
	}

	/// Three-valued ordering: `None` when either side is nil or the values are
	/// not comparable.
	pub fn compare(&self, other: &Value) -> Option<Ordering> {
		match (self, other) {
			(Value::Nil, _) | (_, Value::Nil) => None,
			(Value::Boolean(l), Value::Boolean(r)) => Some(l.cmp(r)),
			(Value::Utf8(l), Value::Utf8(r)) => Some(l.cmp(r)),
			(Value::Int4(_) | Value::Int8(_), Value::Int4(_) | Value::Int8(_)) => {
				Some(self.as_i64()?.cmp(&other.as_i64()?))
			}
			(Value::Float8(_), _) | (_, Value::Float8(_)) => self.as_f64()?.partial_cmp(&other.as_f64()?),
			_ => None,
		}
	}

	/// Total order used for sorting: nil sorts first.
	pub fn sort_cmp(&self, other: &Value) -> Ordering {
		match (self.is_nil(), other.is_nil()) {
			(true, true) => Ordering::Equal,
			(true, false) => Ordering::Less,
			(false, true) => Ordering::Greater,
			(false, false) => self.compare(other).unwrap_or(Ordering::Equal),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cmp::Ordering;

	use crate::value::{Row, Value};

	#[test]
	fn test_nil_equality_is_unknown() {
		assert_eq!(Value::Nil.equals(&Value::int4(1)), None);
		assert_eq!(Value::Nil.equals(&Value::Nil), None);
		assert!(Value::Nil.same(&Value::Nil));
		assert!(!Value::Nil.same(&Value::int4(1)));
	}

	#[test]
	fn test_numeric_cross_width() {
		assert_eq!(Value::int4(3).equals(&Value::int8(3)), Some(true));
		assert_eq!(Value::int4(3).compare(&Value::float8(3.5)), Some(Ordering::Less));
	}

	#[test]
	fn test_row_equality_ignores_column_order() {
		let a = Row::from_pairs([("A", Value::int4(1)), ("B", Value::utf8("x"))]);
		let b = Row::from_pairs([("B", Value::utf8("x")), ("A", Value::int4(1))]);
		assert!(Value::row(a).same(&Value::row(b)));
	}
}
