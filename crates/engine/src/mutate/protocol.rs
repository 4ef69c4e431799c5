// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Column-scoped protocols. Each runs the table's handlers, then the
//! column's, then those of the column's scalar type and its ancestors, and
//! finally the built-in behavior. A stage reports whether it changed the row.

use relcore_plan::{EventHandler, EventKind, TableVar, TableVarColumn};
use relcore_type::{Result, Row, Type, Value};
use tracing::trace;

use crate::{Context, scope::FrameScope, stack::Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Protocol {
	Validate,
	Default,
	Change,
}

impl Protocol {
	fn kind(self) -> EventKind {
		match self {
			Protocol::Validate => EventKind::Validate,
			Protocol::Default => EventKind::Default,
			Protocol::Change => EventKind::Change,
		}
	}

	fn is_enabled(self, table: &TableVar, column: &TableVarColumn) -> bool {
		match self {
			Protocol::Validate => table.should_validate && column.should_validate,
			Protocol::Default => table.should_default && column.should_default,
			Protocol::Change => table.should_change && column.should_change,
		}
	}
}

impl Context {
	/// Runs `protocol` for column `index` of `row`. Defaulting stops at the
	/// first stage that leaves the column with a value.
	pub(super) fn run_protocol(&mut self, protocol: Protocol, table: &TableVar, index: usize, row: &mut Row) -> Result<bool> {
		let column = &table.columns[index];
		if !protocol.is_enabled(table, column) {
			return Ok(false);
		}
		let kind = protocol.kind();
		let supplied = |row: &Row| protocol == Protocol::Default && row.has_value(index);
		let mut changed = false;

		for handler in table.handlers.get(kind).iter().chain(column.handlers.get(kind)) {
			changed |= self.row_handler(handler, table, &column.name, row)?;
			if supplied(row) {
				return Ok(true);
			}
		}

		if let Some(domain) = &column.domain {
			for ty in domain.ancestry() {
				for handler in ty.handlers.get(kind) {
					changed |= self.value_handler(handler, &column.ty, index, row)?;
					if supplied(row) {
						return Ok(true);
					}
				}
			}
		}

		match protocol {
			Protocol::Default => changed |= self.default_value(column, index, row)?,
			Protocol::Validate => {
				let value = Context::conform(&column.ty, row.get(index).clone())?;
				row.set(index, value);
			}
			Protocol::Change => {}
		}
		Ok(changed)
	}

	/// Table and column handlers take the row as a var operand and the
	/// column name.
	fn row_handler(&mut self, handler: &EventHandler, table: &TableVar, column: &str, row: &mut Row) -> Result<bool> {
		let mut arguments = [Value::row(row.clone()), Value::utf8(column)];
		let reported = self.invoke_handler(handler, &mut arguments)?;
		let [updated, _] = arguments;
		let mut changed = reported.as_bool().unwrap_or(false);
		if let Some(updated) = updated.into_row() {
			let updated = updated.conform(&table.row_type);
			changed |= updated.values() != row.values();
			*row = updated;
		}
		trace!(handler = %handler.name, column, changed, "row handler");
		Ok(changed)
	}

	/// Scalar type handlers take the column value as a var operand.
	fn value_handler(&mut self, handler: &EventHandler, ty: &Type, index: usize, row: &mut Row) -> Result<bool> {
		let mut arguments = [row.get(index).clone()];
		let reported = self.invoke_handler(handler, &mut arguments)?;
		let [updated] = arguments;
		let updated = Context::conform(ty, updated)?;
		let changed = reported.as_bool().unwrap_or(false) || !updated.same(row.get(index));
		row.set(index, updated);
		Ok(changed)
	}

	/// The column's default expression, else the nearest default of its
	/// scalar type.
	fn default_value(&mut self, column: &TableVarColumn, index: usize, row: &mut Row) -> Result<bool> {
		let expression = match (&column.default, column.domain.as_ref().and_then(|d| d.effective_default())) {
			(Some(default), _) => default.clone(),
			(None, Some(default)) => default.clone(),
			(None, None) => return Ok(false),
		};
		let value = self.evaluate(&expression)?;
		let value = Context::conform(&column.ty, value)?;
		let supplied = !value.is_nil();
		row.set(index, value);
		Ok(supplied)
	}

	/// Recomputes computed columns from the rest of the row.
	pub(super) fn recompute(&mut self, table: &TableVar, row: &mut Row) -> Result<()> {
		for (index, column) in table.columns.iter().enumerate() {
			let Some(expression) = &column.computed else {
				continue;
			};
			let value = {
				let mut frame = FrameScope::push(self);
				frame.push(Symbol::new("value", Type::Row(row.row_type().clone()), Value::row(row.clone())))?;
				frame.evaluate(expression)?
			};
			row.set(index, Context::conform(&column.ty, value)?);
		}
		Ok(())
	}

	/// Change and validate protocols followed by column checks. With `old`,
	/// the protocols only run for columns whose value differs from it.
	pub(super) fn validate_row(&mut self, table: &TableVar, old: Option<&Row>, row: &mut Row) -> Result<()> {
		self.recompute(table, row)?;
		let mut changed = false;
		for index in 0..table.columns.len() {
			if table.columns[index].computed.is_some() {
				continue;
			}
			if let Some(old) = old {
				if old.get(index).same(row.get(index)) {
					continue;
				}
			}
			changed |= self.run_protocol(Protocol::Change, table, index, row)?;
			changed |= self.run_protocol(Protocol::Validate, table, index, row)?;
		}
		if changed {
			self.recompute(table, row)?;
		}
		for index in 0..table.columns.len() {
			self.check_column(table, index, row)?;
		}
		Ok(())
	}
}
