// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::{Diagnostic, ErrorClass, Severity};

pub fn unauthorized(user: &str, right: &str) -> Diagnostic {
	Diagnostic {
		code: "SECURITY_001".to_string(),
		class: ErrorClass::Security,
		severity: Severity::User,
		message: format!("User '{}' is not authorized for right '{}'", user, right),
		help: Some("Grant the right to the user or one of its roles".to_string()),
		notes: vec![],
		cause: None,
	}
}
