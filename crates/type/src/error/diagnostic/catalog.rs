// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::{Diagnostic, ErrorClass, Severity};

fn catalog(code: &str, message: String) -> Diagnostic {
	Diagnostic {
		code: code.to_string(),
		class: ErrorClass::Application,
		severity: Severity::Application,
		message,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn table_not_found(name: &str) -> Diagnostic {
	catalog("CATALOG_001", format!("Table '{}' not found", name))
}

pub fn operator_not_found(name: &str) -> Diagnostic {
	catalog("CATALOG_002", format!("Operator '{}' not found", name))
}

pub fn column_not_found(table: &str, column: &str) -> Diagnostic {
	catalog("CATALOG_003", format!("Column '{}' not found in '{}'", column, table))
}

pub fn object_already_exists(kind: &str, name: &str) -> Diagnostic {
	catalog("CATALOG_004", format!("{} '{}' already exists", kind, name))
}

pub fn invalid_characteristics(operator: &str, characteristic: &str) -> Diagnostic {
	catalog(
		"CATALOG_005",
		format!("Operator '{}' is declared {} but its body is not", operator, characteristic),
	)
}

pub fn user_not_found(name: &str) -> Diagnostic {
	catalog("CATALOG_006", format!("User '{}' not found", name))
}
