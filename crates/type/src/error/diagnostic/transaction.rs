// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::{Diagnostic, ErrorClass, Severity};

pub fn no_active_transaction() -> Diagnostic {
	Diagnostic {
		code: "TXN_001".to_string(),
		class: ErrorClass::Transaction,
		severity: Severity::Application,
		message: "No transaction is active".to_string(),
		help: Some("Begin a transaction first".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// A deferred check failed during commit; the transaction has been rolled back
pub fn deferred_check_failed(cause: Diagnostic) -> Diagnostic {
	Diagnostic {
		code: "TXN_002".to_string(),
		class: ErrorClass::Transaction,
		severity: Severity::User,
		message: "Deferred check failed at commit, transaction rolled back".to_string(),
		help: None,
		notes: vec![],
		cause: Some(Box::new(cause)),
	}
}

pub fn app_transaction_not_joined() -> Diagnostic {
	Diagnostic {
		code: "TXN_003".to_string(),
		class: ErrorClass::Transaction,
		severity: Severity::Application,
		message: "Process is not joined to an application transaction".to_string(),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn app_transaction_already_joined(id: &str) -> Diagnostic {
	Diagnostic {
		code: "TXN_004".to_string(),
		class: ErrorClass::Transaction,
		severity: Severity::Application,
		message: format!("Process is already joined to application transaction {}", id),
		help: Some("Leave the current application transaction first".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn app_transaction_closed(id: &str) -> Diagnostic {
	Diagnostic {
		code: "TXN_005".to_string(),
		class: ErrorClass::Transaction,
		severity: Severity::Application,
		message: format!("Application transaction {} has already been applied or discarded", id),
		help: None,
		notes: vec![],
		cause: None,
	}
}
