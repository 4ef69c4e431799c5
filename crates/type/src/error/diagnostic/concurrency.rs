// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::{Diagnostic, ErrorClass, Severity};

/// The row read by the client no longer exists in the underlying store
pub fn row_not_found(table: &str) -> Diagnostic {
	Diagnostic {
		code: "CONCURRENCY_001".to_string(),
		class: ErrorClass::Concurrency,
		severity: Severity::User,
		message: format!("Row not found in table '{}', it may have been deleted by another user", table),
		help: Some("Refresh the row and retry".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// The row was changed by another process since it was read
pub fn row_conflict(table: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "CONCURRENCY_002".to_string(),
		class: ErrorClass::Concurrency,
		severity: Severity::User,
		message: format!("Row in table '{}' has been changed by another user", table),
		help: Some("Refresh the row and retry".to_string()),
		notes: vec![format!("column '{}' differs from the stored value", column)],
		cause: None,
	}
}
