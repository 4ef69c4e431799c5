// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_catalog::{Catalog, User};
use relcore_transaction::{ApplicationTransaction, Interceptors, TransactionStack};
use relcore_type::{
	Error, Result, Type, Value,
	error::diagnostic::runtime::{assign_to_constant, nil_condition, operation_aborted, type_mismatch, unknown_variable},
	return_error,
};

use crate::{
	AbortHandle, EngineConfig,
	database::Services,
	stack::{Stack, Symbol},
};

/// Execution state of one process: its stack, security context, transaction
/// levels and application transaction membership.
///
/// Everything that is pushed for the duration of a node or a call is pushed
/// through a scope guard (see [`crate::scope`]) that restores it on drop.
pub struct Context {
	pub(crate) services: Arc<Services>,
	pub(crate) stack: Stack,
	pub(crate) user: User,
	/// Set while the mutation pipeline inserts rows; table reads skip the
	/// application transaction population step.
	pub(crate) is_insert: bool,
	pub(crate) app: Option<ApplicationTransaction>,
	/// Number of global-context pushes of the joined application transaction.
	pub(crate) global_depth: usize,
	/// Errors being handled, innermost last.
	pub(crate) errors: Vec<Error>,
	pub(crate) call_depth: usize,
	pub(crate) abort: AbortHandle,
	pub(crate) transactions: TransactionStack,
}

impl Context {
	pub(crate) fn new(services: Arc<Services>, user: User) -> Self {
		let stack = Stack::new(services.config.max_stack_depth);
		Self {
			services,
			stack,
			user,
			is_insert: false,
			app: None,
			global_depth: 0,
			errors: Vec::new(),
			call_depth: 0,
			abort: AbortHandle::new(),
			transactions: TransactionStack::new(),
		}
	}

	pub(crate) fn config(&self) -> &EngineConfig {
		&self.services.config
	}

	pub(crate) fn catalog(&self) -> &Catalog {
		&self.services.catalog
	}

	pub(crate) fn interceptors(&self) -> Interceptors {
		self.services.interceptors.read().clone()
	}

	pub(crate) fn check_aborted(&self) -> Result<()> {
		if self.abort.is_aborted() {
			return_error!(operation_aborted());
		}
		Ok(())
	}

	/// The joined application transaction, when its global context is pushed.
	pub(crate) fn active_app(&self) -> Option<ApplicationTransaction> {
		if self.global_depth > 0 {
			self.app.clone()
		} else {
			None
		}
	}

	pub(crate) fn read_variable(&self, name: &str) -> Result<Value> {
		match self.stack.find(name) {
			Some(offset) => Ok(self.stack.peek_value(offset)?),
			None => return_error!(unknown_variable(name)),
		}
	}

	/// Stores `value` into the nearest visible variable named `name`, after
	/// validating it against the variable's type and domain.
	pub(crate) fn assign(&mut self, name: &str, value: Value) -> Result<()> {
		let Some(offset) = self.stack.find(name) else {
			return_error!(unknown_variable(name));
		};
		let symbol = self.stack.symbol(offset)?;
		if symbol.is_constant {
			return_error!(assign_to_constant(name));
		}
		let ty = symbol.ty.clone();
		let domain = symbol.domain.clone();
		let value = self.validate_value(&ty, domain.as_deref(), value)?;
		self.stack.poke(offset, value)?;
		Ok(())
	}

	pub(crate) fn push(&mut self, symbol: Symbol) -> Result<()> {
		Ok(self.stack.push(symbol)?)
	}

	pub(crate) fn conform(ty: &Type, value: Value) -> Result<Value> {
		let kind = value.kind();
		match ty.coerce(value) {
			Some(value) => Ok(value),
			None => return_error!(type_mismatch(ty.to_string(), kind)),
		}
	}

	/// Evaluates a condition under the three-valued rules: nil counts as
	/// false while nil propagation is enabled.
	pub(crate) fn truth(&self, value: Value) -> Result<bool> {
		match value {
			Value::Boolean(b) => Ok(b),
			Value::Nil if self.config().propagate_nil => Ok(false),
			Value::Nil => return_error!(nil_condition()),
			other => return_error!(type_mismatch("Boolean", other.kind())),
		}
	}
}
