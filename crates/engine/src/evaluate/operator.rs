// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::{BinaryOp, PlanNode, UnaryOp};
use relcore_type::{
	Result, Value,
	error::diagnostic::runtime::{division_by_zero, numeric_overflow, type_mismatch},
	internal_error, return_error,
};

use crate::Context;

impl Context {
	pub(super) fn binary(&mut self, op: BinaryOp, left: &PlanNode, right: &PlanNode) -> Result<Value> {
		match op {
			BinaryOp::And => {
				let left = logical(self.evaluate(left)?)?;
				if left == Some(false) {
					return Ok(Value::Boolean(false));
				}
				let right = logical(self.evaluate(right)?)?;
				Ok(match (left, right) {
					(_, Some(false)) => Value::Boolean(false),
					(Some(true), Some(true)) => Value::Boolean(true),
					_ => Value::Nil,
				})
			}
			BinaryOp::Or => {
				let left = logical(self.evaluate(left)?)?;
				if left == Some(true) {
					return Ok(Value::Boolean(true));
				}
				let right = logical(self.evaluate(right)?)?;
				Ok(match (left, right) {
					(_, Some(true)) => Value::Boolean(true),
					(Some(false), Some(false)) => Value::Boolean(false),
					_ => Value::Nil,
				})
			}
			_ => {
				let left = self.evaluate(left)?;
				let right = self.evaluate(right)?;
				apply(op, left, right)
			}
		}
	}
}

fn logical(value: Value) -> Result<Option<bool>> {
	match value {
		Value::Nil => Ok(None),
		Value::Boolean(b) => Ok(Some(b)),
		other => return_error!(type_mismatch("Boolean", other.kind())),
	}
}

pub(super) fn unary(op: UnaryOp, operand: Value) -> Result<Value> {
	match (op, operand) {
		(_, Value::Nil) => Ok(Value::Nil),
		(UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
		(UnaryOp::Negate, Value::Int4(v)) => match v.checked_neg() {
			Some(v) => Ok(Value::Int4(v)),
			None => Ok(Value::Int8(-(v as i64))),
		},
		(UnaryOp::Negate, Value::Int8(v)) => match v.checked_neg() {
			Some(v) => Ok(Value::Int8(v)),
			None => return_error!(numeric_overflow("-")),
		},
		(UnaryOp::Negate, Value::Float8(v)) => Ok(Value::float8(-v.value())),
		(UnaryOp::Not, other) => return_error!(type_mismatch("Boolean", other.kind())),
		(UnaryOp::Negate, other) => return_error!(type_mismatch("numeric", other.kind())),
	}
}

fn apply(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
	match op {
		BinaryOp::Equal => Ok(left.equals(&right).map(Value::Boolean).unwrap_or(Value::Nil)),
		BinaryOp::NotEqual => Ok(left.equals(&right).map(|eq| Value::Boolean(!eq)).unwrap_or(Value::Nil)),
		BinaryOp::Less | BinaryOp::LessOrEqual | BinaryOp::Greater | BinaryOp::GreaterOrEqual => {
			if left.is_nil() || right.is_nil() {
				return Ok(Value::Nil);
			}
			let Some(ordering) = left.compare(&right) else {
				return_error!(type_mismatch(left.kind(), right.kind()));
			};
			Ok(Value::Boolean(match op {
				BinaryOp::Less => ordering.is_lt(),
				BinaryOp::LessOrEqual => ordering.is_le(),
				BinaryOp::Greater => ordering.is_gt(),
				_ => ordering.is_ge(),
			}))
		}
		BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => arithmetic(op, left, right),
		BinaryOp::And | BinaryOp::Or => Err(internal_error!("logical operator '{}' evaluated eagerly", op)),
	}
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
	match (left, right) {
		(Value::Nil, _) | (_, Value::Nil) => Ok(Value::Nil),
		(Value::Utf8(l), Value::Utf8(r)) if op == BinaryOp::Add => Ok(Value::Utf8(l + &r)),
		(Value::Int4(l), Value::Int4(r)) => match int4(op, l, r)? {
			Some(v) => Ok(Value::Int4(v)),
			None => int8(op, l as i64, r as i64),
		},
		(l @ (Value::Int4(_) | Value::Int8(_)), r @ (Value::Int4(_) | Value::Int8(_))) => {
			int8(op, l.as_i64().unwrap_or_default(), r.as_i64().unwrap_or_default())
		}
		(l, r) => match (l.as_f64(), r.as_f64()) {
			(Some(l), Some(r)) => float8(op, l, r),
			_ => return_error!(type_mismatch(l.kind(), r.kind())),
		},
	}
}

/// `None` when the result does not fit, so the caller can widen.
fn int4(op: BinaryOp, l: i32, r: i32) -> Result<Option<i32>> {
	Ok(match op {
		BinaryOp::Add => l.checked_add(r),
		BinaryOp::Subtract => l.checked_sub(r),
		BinaryOp::Multiply => l.checked_mul(r),
		_ => {
			if r == 0 {
				return_error!(division_by_zero());
			}
			l.checked_div(r)
		}
	})
}

fn int8(op: BinaryOp, l: i64, r: i64) -> Result<Value> {
	let result = match op {
		BinaryOp::Add => l.checked_add(r),
		BinaryOp::Subtract => l.checked_sub(r),
		BinaryOp::Multiply => l.checked_mul(r),
		_ => {
			if r == 0 {
				return_error!(division_by_zero());
			}
			l.checked_div(r)
		}
	};
	match result {
		Some(v) => Ok(Value::Int8(v)),
		None => return_error!(numeric_overflow(&op.to_string())),
	}
}

fn float8(op: BinaryOp, l: f64, r: f64) -> Result<Value> {
	let result = match op {
		BinaryOp::Add => l + r,
		BinaryOp::Subtract => l - r,
		BinaryOp::Multiply => l * r,
		_ => {
			if r == 0.0 {
				return_error!(division_by_zero());
			}
			l / r
		}
	};
	if !result.is_finite() {
		return_error!(numeric_overflow(&op.to_string()));
	}
	Ok(Value::float8(result))
}

#[cfg(test)]
mod tests {
	use relcore_plan::{BinaryOp, UnaryOp};
	use relcore_type::Value;

	use super::{apply, unary};

	#[test]
	fn test_int4_overflow_widens() {
		let result = apply(BinaryOp::Add, Value::int4(i32::MAX), Value::int4(1)).unwrap();
		assert_eq!(result, Value::Int8(i32::MAX as i64 + 1));
	}

	#[test]
	fn test_nil_propagates_through_arithmetic_and_comparison() {
		assert_eq!(apply(BinaryOp::Multiply, Value::Nil, Value::int4(2)).unwrap(), Value::Nil);
		assert_eq!(apply(BinaryOp::Less, Value::int4(1), Value::Nil).unwrap(), Value::Nil);
		assert_eq!(apply(BinaryOp::Equal, Value::Nil, Value::Nil).unwrap(), Value::Nil);
	}

	#[test]
	fn test_division_by_zero() {
		assert_eq!(apply(BinaryOp::Divide, Value::int4(1), Value::int4(0)).unwrap_err().code(), "RUNTIME_011");
		assert_eq!(apply(BinaryOp::Divide, Value::float8(1.0), Value::int8(0)).unwrap_err().code(), "RUNTIME_011");
	}

	#[test]
	fn test_concat_and_mixed_numeric() {
		assert_eq!(apply(BinaryOp::Add, Value::utf8("a"), Value::utf8("b")).unwrap(), Value::utf8("ab"));
		assert_eq!(apply(BinaryOp::Add, Value::int4(1), Value::float8(0.5)).unwrap(), Value::float8(1.5));
	}

	#[test]
	fn test_unary() {
		assert_eq!(unary(UnaryOp::Not, Value::Nil).unwrap(), Value::Nil);
		assert_eq!(unary(UnaryOp::Not, Value::bool(true)).unwrap(), Value::bool(false));
		assert_eq!(unary(UnaryOp::Negate, Value::int4(i32::MIN)).unwrap(), Value::Int8(-(i32::MIN as i64)));
	}
}
