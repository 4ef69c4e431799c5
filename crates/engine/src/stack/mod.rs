// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The process stack: named slots organized into frames (lexical scopes) and
//! windows (call boundaries). Relative offsets count down from the top of the
//! stack and may never reach below the current window.

use std::sync::Arc;

use relcore_plan::ScalarType;
use relcore_type::{Type, Value};

mod error;

pub use error::StackError;

#[derive(Debug, Clone)]
pub enum Slot {
	Value(Value),
	/// Indirection to another slot, by absolute index.
	Reference(usize),
}

#[derive(Debug, Clone)]
pub struct Symbol {
	pub name: Option<String>,
	pub ty: Type,
	pub domain: Option<Arc<ScalarType>>,
	pub is_constant: bool,
	slot: Slot,
}

impl Symbol {
	pub fn new(name: impl Into<String>, ty: Type, value: Value) -> Self {
		Self {
			name: Some(name.into()),
			ty,
			domain: None,
			is_constant: false,
			slot: Slot::Value(value),
		}
	}

	pub fn anonymous(value: Value) -> Self {
		Self {
			name: None,
			ty: Type::Any,
			domain: None,
			is_constant: false,
			slot: Slot::Value(value),
		}
	}

	/// A read-only alias of the slot at `target`.
	pub fn reference(name: impl Into<String>, ty: Type, target: usize) -> Self {
		Self {
			name: Some(name.into()),
			ty,
			domain: None,
			is_constant: true,
			slot: Slot::Reference(target),
		}
	}

	pub fn constant(mut self) -> Self {
		self.is_constant = true;
		self
	}

	pub fn with_domain(mut self, domain: Option<Arc<ScalarType>>) -> Self {
		self.domain = domain;
		self
	}

	pub fn slot(&self) -> &Slot {
		&self.slot
	}

	fn is_named(&self, name: &str) -> bool {
		self.name.as_deref() == Some(name)
	}
}

/// Restore point for [`Stack::truncate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackMark {
	len: usize,
	frames: usize,
	windows: usize,
}

impl StackMark {
	pub fn len(&self) -> usize {
		self.len
	}
}

#[derive(Debug)]
pub struct Stack {
	symbols: Vec<Symbol>,
	frames: Vec<usize>,
	windows: Vec<usize>,
	max_depth: usize,
}

impl Stack {
	pub fn new(max_depth: usize) -> Self {
		Self {
			symbols: Vec::new(),
			frames: Vec::new(),
			windows: Vec::new(),
			max_depth,
		}
	}

	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}

	pub fn frame_depth(&self) -> usize {
		self.frames.len()
	}

	pub fn window_depth(&self) -> usize {
		self.windows.len()
	}

	fn window_base(&self) -> usize {
		self.windows.last().copied().unwrap_or(0)
	}

	/// Number of slots visible to relative addressing.
	pub fn window_len(&self) -> usize {
		self.symbols.len() - self.window_base()
	}

	pub fn push(&mut self, symbol: Symbol) -> Result<(), StackError> {
		if self.symbols.len() >= self.max_depth {
			return Err(StackError::Overflow {
				max_depth: self.max_depth,
			});
		}
		self.symbols.push(symbol);
		Ok(())
	}

	pub fn pop(&mut self) -> Result<Symbol, StackError> {
		if self.window_len() == 0 {
			return Err(StackError::Underflow);
		}
		self.symbols.pop().ok_or(StackError::Underflow)
	}

	/// Absolute index of the slot at `offset` from the top.
	pub fn index_of(&self, offset: usize) -> Result<usize, StackError> {
		let window = self.window_len();
		if offset >= window {
			return Err(StackError::OffsetOutOfWindow {
				offset,
				window,
			});
		}
		Ok(self.symbols.len() - 1 - offset)
	}

	fn resolve(&self, mut index: usize) -> usize {
		while let Slot::Reference(target) = self.symbols[index].slot {
			index = target;
		}
		index
	}

	fn value_at(&self, mut index: usize) -> &Value {
		loop {
			match &self.symbols[index].slot {
				Slot::Value(value) => return value,
				Slot::Reference(target) => index = *target,
			}
		}
	}

	pub fn symbol(&self, offset: usize) -> Result<&Symbol, StackError> {
		let index = self.index_of(offset)?;
		Ok(&self.symbols[index])
	}

	/// The stored value at `offset`, without copying.
	pub fn peek(&self, offset: usize) -> Result<&Value, StackError> {
		let index = self.index_of(offset)?;
		Ok(self.value_at(index))
	}

	/// An independent copy of the value at `offset`.
	pub fn peek_value(&self, offset: usize) -> Result<Value, StackError> {
		self.peek(offset).cloned()
	}

	/// Replaces the value at `offset`, writing through references.
	pub fn poke(&mut self, offset: usize, value: Value) -> Result<(), StackError> {
		let index = self.index_of(offset)?;
		let target = self.resolve(index);
		self.symbols[target].slot = Slot::Value(value);
		Ok(())
	}

	/// Offset of the nearest visible symbol named `name`.
	pub fn find(&self, name: &str) -> Option<usize> {
		let len = self.symbols.len();
		(self.window_base()..len).rev().find(|&i| self.symbols[i].is_named(name)).map(|i| len - 1 - i)
	}

	pub fn push_frame(&mut self) {
		self.frames.push(self.symbols.len());
	}

	/// Pops the innermost frame together with every symbol pushed inside it.
	pub fn pop_frame(&mut self) -> Result<(), StackError> {
		let base = self.frames.pop().ok_or(StackError::Unbalanced("frame"))?;
		self.symbols.truncate(base);
		Ok(())
	}

	/// Hides everything but the top `size` slots from relative addressing.
	pub fn push_window(&mut self, size: usize) -> Result<(), StackError> {
		let visible = self.window_len();
		if size > visible {
			return Err(StackError::WindowTooLarge {
				requested: size,
				visible,
			});
		}
		self.windows.push(self.symbols.len() - size);
		Ok(())
	}

	/// Pops the innermost window. Its slots stay on the stack.
	pub fn pop_window(&mut self) -> Result<(), StackError> {
		self.windows.pop().ok_or(StackError::Unbalanced("window"))?;
		Ok(())
	}

	pub fn mark(&self) -> StackMark {
		StackMark {
			len: self.symbols.len(),
			frames: self.frames.len(),
			windows: self.windows.len(),
		}
	}

	/// Drops every symbol, frame and window pushed after `mark`.
	pub fn truncate(&mut self, mark: StackMark) {
		self.windows.truncate(mark.windows);
		self.frames.truncate(mark.frames);
		self.symbols.truncate(mark.len);
	}
}

#[cfg(test)]
mod tests {
	use relcore_type::{Type, Value};

	use super::{Stack, StackError, Symbol};

	#[test]
	fn test_window_hides_caller_slots() {
		let mut stack = Stack::new(16);
		stack.push(Symbol::new("a", Type::Int4, Value::int4(1))).unwrap();
		stack.push(Symbol::new("b", Type::Int4, Value::int4(2))).unwrap();
		stack.push_window(1).unwrap();

		assert_eq!(stack.peek(0).unwrap(), &Value::int4(2));
		assert_eq!(
			stack.peek(1).unwrap_err(),
			StackError::OffsetOutOfWindow {
				offset: 1,
				window: 1
			}
		);
		assert_eq!(stack.find("a"), None);
		assert_eq!(stack.find("b"), Some(0));

		stack.pop_window().unwrap();
		assert_eq!(stack.find("a"), Some(1));
	}

	#[test]
	fn test_reference_reads_and_writes_through() {
		let mut stack = Stack::new(16);
		stack.push(Symbol::new("x", Type::Int4, Value::int4(5))).unwrap();
		stack.push(Symbol::reference("y", Type::Int4, 0)).unwrap();

		assert_eq!(stack.peek_value(0).unwrap(), Value::int4(5));
		stack.poke(0, Value::int4(6)).unwrap();
		assert_eq!(stack.peek(1).unwrap(), &Value::int4(6));
	}

	#[test]
	fn test_overflow() {
		let mut stack = Stack::new(2);
		stack.push(Symbol::anonymous(Value::Nil)).unwrap();
		stack.push(Symbol::anonymous(Value::Nil)).unwrap();
		assert_eq!(
			stack.push(Symbol::anonymous(Value::Nil)).unwrap_err(),
			StackError::Overflow {
				max_depth: 2
			}
		);
	}

	#[test]
	fn test_frame_pops_its_symbols() {
		let mut stack = Stack::new(16);
		stack.push(Symbol::anonymous(Value::int4(1))).unwrap();
		stack.push_frame();
		stack.push(Symbol::anonymous(Value::int4(2))).unwrap();
		stack.push(Symbol::anonymous(Value::int4(3))).unwrap();
		stack.pop_frame().unwrap();
		assert_eq!(stack.len(), 1);
		assert_eq!(stack.pop_frame().unwrap_err(), StackError::Unbalanced("frame"));
	}

	#[test]
	fn test_truncate_to_mark() {
		let mut stack = Stack::new(16);
		let mark = stack.mark();
		stack.push(Symbol::anonymous(Value::Nil)).unwrap();
		stack.push_frame();
		stack.push(Symbol::anonymous(Value::Nil)).unwrap();
		stack.push_window(1).unwrap();
		stack.truncate(mark);
		assert_eq!(stack.len(), 0);
		assert_eq!(stack.frame_depth(), 0);
		assert_eq!(stack.window_depth(), 0);
	}

	#[test]
	fn test_pop_stops_at_window() {
		let mut stack = Stack::new(16);
		stack.push(Symbol::anonymous(Value::Nil)).unwrap();
		stack.push_window(0).unwrap();
		assert_eq!(stack.pop().unwrap_err(), StackError::Underflow);
	}
}
