// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::{Diagnostic, ErrorClass, Severity};

fn violation(code: &str, message: String, help: Option<String>) -> Diagnostic {
	Diagnostic {
		code: code.to_string(),
		class: ErrorClass::Constraint,
		severity: Severity::User,
		message,
		help,
		notes: vec![],
		cause: None,
	}
}

/// A row-level constraint of a table evaluated to false
pub fn row_constraint_violated(table: &str, constraint: &str, custom: Option<String>) -> Diagnostic {
	let message = custom.unwrap_or_else(|| format!("Constraint '{}' violated for table '{}'", constraint, table));
	violation("CONSTRAINT_001", message, None)
}

/// An insert, update or delete transition constraint evaluated to false
pub fn transition_constraint_violated(
	table: &str,
	constraint: &str,
	transition: &str,
	custom: Option<String>,
) -> Diagnostic {
	let message = custom.unwrap_or_else(|| {
		format!("{} constraint '{}' violated for table '{}'", transition, constraint, table)
	});
	violation("CONSTRAINT_002", message, None)
}

/// A database-wide constraint evaluated to false
pub fn catalog_constraint_violated(constraint: &str, custom: Option<String>) -> Diagnostic {
	let message = custom.unwrap_or_else(|| format!("Catalog constraint '{}' violated", constraint));
	violation("CONSTRAINT_003", message, None)
}

pub fn key_violation(table: &str, columns: &[String]) -> Diagnostic {
	violation(
		"CONSTRAINT_004",
		format!("Key {{{}}} of table '{}' would have a duplicate value", columns.join(", "), table),
		Some("Use a value that does not exist yet for the key columns".to_string()),
	)
}

pub fn column_value_required(table: &str, column: &str) -> Diagnostic {
	violation(
		"CONSTRAINT_005",
		format!("Column '{}' of table '{}' requires a value", column, table),
		Some("Supply a value or declare the column nilable".to_string()),
	)
}

pub fn scalar_type_constraint_violated(scalar_type: &str, constraint: &str, custom: Option<String>) -> Diagnostic {
	let message = custom
		.unwrap_or_else(|| format!("Value violates constraint '{}' of type '{}'", constraint, scalar_type));
	violation("CONSTRAINT_006", message, None)
}

pub fn column_constraint_violated(table: &str, column: &str, constraint: &str, custom: Option<String>) -> Diagnostic {
	let message = custom.unwrap_or_else(|| {
		format!("Constraint '{}' violated for column '{}' of table '{}'", constraint, column, table)
	});
	violation("CONSTRAINT_007", message, None)
}
