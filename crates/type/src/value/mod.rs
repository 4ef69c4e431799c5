// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use crate::error::Error;

mod compare;
mod flags;
mod ordered_f64;
mod row;
mod r#type;

pub use flags::ValueFlags;
pub use ordered_f64::OrderedF64;
pub use row::{Row, RowType};
pub use r#type::Type;

/// A runtime value, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	/// No value (nil)
	Nil,
	Boolean(bool),
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte signed integer
	Int8(i64),
	/// An 8-byte floating point, never NaN
	Float8(OrderedF64),
	Utf8(String),
	Row(Box<Row>),
	List(Vec<Value>),
	/// A materialized set of rows, as produced by a table expression
	Table(Vec<Row>),
	/// An error value, as bound by an exception handler or built by an
	/// error selector
	Error(Box<Error>),
}

impl Value {
	pub fn nil() -> Self {
		Value::Nil
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into()).map(Value::Float8).unwrap_or(Value::Nil)
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn row(row: Row) -> Self {
		Value::Row(Box::new(row))
	}

	pub fn error(error: Error) -> Self {
		Value::Error(Box::new(error))
	}

	pub fn is_nil(&self) -> bool {
		matches!(self, Value::Nil)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int4(v) => Some(*v as i64),
			Value::Int8(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int4(v) => Some(*v as f64),
			Value::Int8(v) => Some(*v as f64),
			Value::Float8(v) => Some(v.value()),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(s) => Some(s.as_str()),
			_ => None,
		}
	}

	pub fn as_row(&self) -> Option<&Row> {
		match self {
			Value::Row(row) => Some(row),
			_ => None,
		}
	}

	pub fn as_row_mut(&mut self) -> Option<&mut Row> {
		match self {
			Value::Row(row) => Some(row),
			_ => None,
		}
	}

	pub fn into_row(self) -> Option<Row> {
		match self {
			Value::Row(row) => Some(*row),
			_ => None,
		}
	}

	pub fn as_error(&self) -> Option<&Error> {
		match self {
			Value::Error(e) => Some(e),
			_ => None,
		}
	}

	/// Name of the value's kind, used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Nil => "nil",
			Value::Boolean(_) => "Boolean",
			Value::Int4(_) => "Int4",
			Value::Int8(_) => "Int8",
			Value::Float8(_) => "Float8",
			Value::Utf8(_) => "Utf8",
			Value::Row(_) => "Row",
			Value::List(_) => "List",
			Value::Table(_) => "Table",
			Value::Error(_) => "Error",
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Nil => f.write_str("nil"),
			Value::Boolean(b) => write!(f, "{}", b),
			Value::Int4(v) => write!(f, "{}", v),
			Value::Int8(v) => write!(f, "{}", v),
			Value::Float8(v) => write!(f, "{}", v),
			Value::Utf8(s) => write!(f, "\"{}\"", s),
			Value::Row(row) => write!(f, "{}", row),
			Value::List(items) => {
				f.write_str("list{")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", item)?;
				}
				f.write_str("}")
			}
			Value::Table(rows) => write!(f, "table[{} rows]", rows.len()),
			Value::Error(e) => write!(f, "error({})", e.code()),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int4(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Value::Nil)
	}
}
