// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Classification of an error, used by exception handlers to select which
/// errors they catch. Classes form a tree rooted at [`ErrorClass::Error`];
/// [`ErrorClass::Internal`] sits outside of it and is never caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
	Error,
	User,
	Runtime,
	Application,
	Constraint,
	Concurrency,
	Security,
	Transaction,
	Internal,
}

impl ErrorClass {
	pub fn parent(&self) -> Option<ErrorClass> {
		match self {
			ErrorClass::Error | ErrorClass::Internal => None,
			ErrorClass::User | ErrorClass::Runtime | ErrorClass::Application => Some(ErrorClass::Error),
			ErrorClass::Constraint
			| ErrorClass::Concurrency
			| ErrorClass::Security
			| ErrorClass::Transaction => Some(ErrorClass::Application),
		}
	}

	/// Returns true when `self` equals `ancestor` or descends from it.
	pub fn is_a(&self, ancestor: ErrorClass) -> bool {
		let mut current = Some(*self);
		while let Some(class) = current {
			if class == ancestor {
				return true;
			}
			current = class.parent();
		}
		false
	}

	pub fn is_catchable(&self) -> bool {
		*self != ErrorClass::Internal
	}
}

impl Display for ErrorClass {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			ErrorClass::Error => "Error",
			ErrorClass::User => "UserError",
			ErrorClass::Runtime => "RuntimeError",
			ErrorClass::Application => "ApplicationError",
			ErrorClass::Constraint => "ConstraintError",
			ErrorClass::Concurrency => "ConcurrencyError",
			ErrorClass::Security => "SecurityError",
			ErrorClass::Transaction => "TransactionError",
			ErrorClass::Internal => "InternalError",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
	User,
	Application,
	Environment,
	Fatal,
}

impl Display for Severity {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Severity::User => f.write_str("user"),
			Severity::Application => f.write_str("application"),
			Severity::Environment => f.write_str("environment"),
			Severity::Fatal => f.write_str("fatal"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::ErrorClass;

	#[test]
	fn test_constraint_is_application_error() {
		assert!(ErrorClass::Constraint.is_a(ErrorClass::Application));
		assert!(ErrorClass::Constraint.is_a(ErrorClass::Error));
		assert!(!ErrorClass::Constraint.is_a(ErrorClass::Runtime));
	}

	#[test]
	fn test_internal_outside_hierarchy() {
		assert!(!ErrorClass::Internal.is_a(ErrorClass::Error));
		assert!(!ErrorClass::Internal.is_catchable());
	}
}
