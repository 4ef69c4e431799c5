// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

mod class;
pub mod diagnostic;

pub use class::{ErrorClass, Severity};
pub use diagnostic::{Diagnostic, IntoDiagnostic};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

impl Error {
	pub fn diagnostic(&self) -> &Diagnostic {
		&self.0
	}

	pub fn into_diagnostic(self) -> Diagnostic {
		self.0
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}

	pub fn class(&self) -> ErrorClass {
		self.0.class
	}

	pub fn severity(&self) -> Severity {
		self.0.severity
	}

	pub fn message(&self) -> &str {
		&self.0.message
	}

	/// The wrapped inner error, if any.
	pub fn cause(&self) -> Option<Error> {
		self.0.cause.as_ref().map(|c| Error((**c).clone()))
	}

	/// Wraps `inner` as the cause of this error, keeping any existing chain
	/// below it.
	pub fn with_cause(mut self, inner: Error) -> Self {
		self.0.cause = Some(Box::new(inner.0));
		self
	}

	pub fn is_internal(&self) -> bool {
		self.0.class == ErrorClass::Internal
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&diagnostic::render(&self.0))
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Error(diagnostic)
	}
}

#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return Err($crate::error::Error($diagnostic))
	};
}

#[macro_export]
macro_rules! internal_error {
	($($arg:tt)*) => {
		$crate::error::Error($crate::error::diagnostic::internal::internal(format!($($arg)*)))
	};
}

#[cfg(test)]
mod tests {
	use super::{Error, diagnostic::constraint, diagnostic::runtime};

	#[test]
	fn test_display_renders_cause_chain() {
		let inner = Error(runtime::nil_error_expected());
		let outer = Error(constraint::catalog_constraint_violated("balanced", None)).with_cause(inner);

		let rendered = outer.to_string();
		assert!(rendered.contains("CONSTRAINT_003"));
		assert!(rendered.contains("caused by"));
		assert!(rendered.contains("RUNTIME_001"));
	}

	#[test]
	fn test_cause_roundtrip() {
		let inner = Error(runtime::operation_aborted());
		let outer = Error(runtime::timeout(10)).with_cause(inner.clone());
		assert_eq!(outer.cause(), Some(inner));
	}
}
