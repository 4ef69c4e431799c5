// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::{Constraint, ScalarType, TableVar};
use relcore_transaction::{DeferredCheck, Transition};
use relcore_type::{
	Result, Row, Type, Value,
	error::diagnostic::{
		constraint::{
			catalog_constraint_violated, column_constraint_violated, column_value_required,
			row_constraint_violated, scalar_type_constraint_violated, transition_constraint_violated,
		},
		runtime::type_mismatch,
	},
	return_error,
};
use tracing::trace;

use crate::{Context, scope::FrameScope, stack::Symbol};

impl Context {
	/// Coerces `value` to `ty` and checks it against the constraints of
	/// `domain` and every type it derives from.
	pub(crate) fn validate_value(&mut self, ty: &Type, domain: Option<&ScalarType>, value: Value) -> Result<Value> {
		let value = Context::conform(ty, value)?;
		if let Some(domain) = domain {
			if !value.is_nil() {
				self.check_scalar_constraints(domain, &value)?;
			}
		}
		Ok(value)
	}

	fn check_scalar_constraints(&mut self, domain: &ScalarType, value: &Value) -> Result<()> {
		for ty in domain.ancestry() {
			for constraint in &ty.constraints {
				if !self.satisfies(constraint, vec![("value", value.clone())])? {
					return_error!(scalar_type_constraint_violated(
						&ty.name,
						&constraint.name,
						constraint.message.clone()
					));
				}
			}
		}
		Ok(())
	}

	/// Evaluates `constraint` with `symbols` in scope. Nil satisfies.
	fn satisfies(&mut self, constraint: &Constraint, symbols: Vec<(&str, Value)>) -> Result<bool> {
		let mut frame = FrameScope::push(self);
		for (name, value) in symbols {
			frame.push(Symbol::new(name, Type::Any, value))?;
		}
		match frame.evaluate(&constraint.expression)? {
			Value::Boolean(b) => Ok(b),
			Value::Nil => Ok(true),
			other => return_error!(type_mismatch("Boolean", other.kind())),
		}
	}

	/// Required-value and column constraints of column `index`, then the
	/// constraints of its domain.
	pub(super) fn check_column(&mut self, table: &TableVar, index: usize, row: &Row) -> Result<()> {
		let column = &table.columns[index];
		let value = row.get(index);
		if value.is_nil() {
			if !column.is_nilable {
				return_error!(column_value_required(&table.name, &column.name));
			}
			return Ok(());
		}
		for constraint in &column.constraints {
			if !self.satisfies(constraint, vec![("value", value.clone())])? {
				return_error!(column_constraint_violated(
					&table.name,
					&column.name,
					&constraint.name,
					constraint.message.clone()
				));
			}
		}
		if let Some(domain) = &column.domain {
			self.check_scalar_constraints(domain, value)?;
		}
		Ok(())
	}

	/// Row constraints over `new` and the transition constraints of
	/// `transition`.
	pub(super) fn check_row_constraints(
		&mut self,
		table: &Arc<TableVar>,
		transition: Transition,
		old: Option<&Row>,
		new: Option<&Row>,
	) -> Result<()> {
		if let Some(row) = new {
			for constraint in &table.constraints {
				self.check_or_defer(DeferredCheck::Row {
					table: table.clone(),
					constraint: constraint.clone(),
					row: row.clone(),
				})?;
			}
		}
		let constraints = match transition {
			Transition::Insert => &table.insert_constraints,
			Transition::Update => &table.update_constraints,
			Transition::Delete => &table.delete_constraints,
		};
		for constraint in constraints {
			self.check_or_defer(DeferredCheck::Transition {
				table: table.clone(),
				constraint: constraint.clone(),
				transition,
				old: old.cloned(),
				new: new.cloned(),
			})?;
		}
		Ok(())
	}

	pub(super) fn check_catalog_constraints(&mut self) -> Result<()> {
		for constraint in self.catalog().constraints() {
			self.check_or_defer(DeferredCheck::Catalog {
				constraint,
			})?;
		}
		Ok(())
	}

	/// Deferred constraints wait for commit while a transaction is open.
	fn check_or_defer(&mut self, check: DeferredCheck) -> Result<()> {
		if check.constraint().is_deferred && self.transactions.in_transaction() {
			trace!(constraint = %check.constraint().name, "check deferred");
			self.transactions.defer_check(check);
			return Ok(());
		}
		self.run_check(&check)
	}

	pub(crate) fn run_check(&mut self, check: &DeferredCheck) -> Result<()> {
		match check {
			DeferredCheck::Row {
				table,
				constraint,
				row,
			} => {
				if !self.satisfies(constraint, vec![("value", Value::row(row.clone()))])? {
					return_error!(row_constraint_violated(&table.name, &constraint.name, constraint.message.clone()));
				}
			}
			DeferredCheck::Transition {
				table,
				constraint,
				transition,
				old,
				new,
			} => {
				let mut symbols = Vec::with_capacity(2);
				if let Some(old) = old {
					symbols.push(("old", Value::row(old.clone())));
				}
				if let Some(new) = new {
					symbols.push(("new", Value::row(new.clone())));
				}
				if !self.satisfies(constraint, symbols)? {
					return_error!(transition_constraint_violated(
						&table.name,
						&constraint.name,
						&transition.to_string(),
						constraint.message.clone()
					));
				}
			}
			DeferredCheck::Catalog {
				constraint,
			} => {
				if !self.satisfies(constraint, Vec::new())? {
					return_error!(catalog_constraint_violated(&constraint.name, constraint.message.clone()));
				}
			}
		}
		Ok(())
	}

	/// A deferred row check sees the row as it is at commit, located by its
	/// identity. A row deleted or re-keyed since is no longer checked.
	fn refresh_check(&mut self, check: &DeferredCheck) -> Result<Option<DeferredCheck>> {
		let DeferredCheck::Row {
			table,
			constraint,
			row,
		} = check
		else {
			return Ok(Some(check.clone()));
		};
		let Some(current) = self.reselect(table, row)? else {
			trace!(table = %table.name, constraint = %constraint.name, "deferred row gone, check dropped");
			return Ok(None);
		};
		Ok(Some(DeferredCheck::Row {
			table: table.clone(),
			constraint: constraint.clone(),
			row: current,
		}))
	}

	/// Runs everything deferred to commit. Handlers run after the checks and
	/// may defer further work, which is drained in turn.
	pub(crate) fn run_deferred(&mut self) -> Result<()> {
		loop {
			let (checks, handlers) = self.transactions.take_deferred();
			if checks.is_empty() && handlers.is_empty() {
				return Ok(());
			}
			trace!(checks = checks.len(), handlers = handlers.len(), "run deferred");
			for check in &checks {
				if let Some(check) = self.refresh_check(check)? {
					self.run_check(&check)?;
				}
			}
			for handler in &handlers {
				self.run_deferred_handler(handler)?;
			}
		}
	}
}
