// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::{Diagnostic, ErrorClass, Severity};

fn runtime(code: &str, severity: Severity, message: String, help: Option<&str>) -> Diagnostic {
	Diagnostic {
		code: code.to_string(),
		class: ErrorClass::Runtime,
		severity,
		message,
		help: help.map(str::to_string),
		notes: vec![],
		cause: None,
	}
}

pub fn nil_error_expected() -> Diagnostic {
	runtime(
		"RUNTIME_001",
		Severity::Application,
		"Nil encountered where an error was expected".to_string(),
		Some("Re-raise without an argument only inside an exception handler"),
	)
}

pub fn nil_condition() -> Diagnostic {
	runtime(
		"RUNTIME_002",
		Severity::Application,
		"Condition evaluated to nil".to_string(),
		Some("Enable nil propagation or make the condition non-nilable"),
	)
}

pub fn stack_overflow(max_depth: usize) -> Diagnostic {
	runtime(
		"RUNTIME_003",
		Severity::Environment,
		format!("Stack overflow: maximum stack depth of {} exceeded", max_depth),
		None,
	)
}

pub fn call_depth_exceeded(max_depth: usize) -> Diagnostic {
	runtime(
		"RUNTIME_004",
		Severity::Environment,
		format!("Maximum call depth of {} exceeded", max_depth),
		Some("Check for unbounded recursion"),
	)
}

pub fn operation_aborted() -> Diagnostic {
	runtime("RUNTIME_005", Severity::Environment, "Operation aborted".to_string(), None)
}

pub fn timeout(millis: u128) -> Diagnostic {
	runtime(
		"RUNTIME_006",
		Severity::Environment,
		format!("Operation did not complete within {}ms", millis),
		Some("The operation has been signalled to abort at its next call boundary"),
	)
}

pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Diagnostic {
	runtime(
		"RUNTIME_007",
		Severity::Application,
		format!("Type mismatch: expected {}, found {}", expected.into(), actual.into()),
		None,
	)
}

pub fn capability_not_supported(capability: &str) -> Diagnostic {
	runtime(
		"RUNTIME_008",
		Severity::Application,
		format!("Capability '{}' is not supported", capability),
		None,
	)
}

pub fn assign_to_constant(name: &str) -> Diagnostic {
	runtime("RUNTIME_009", Severity::Application, format!("Cannot assign to constant '{}'", name), None)
}

pub fn unknown_variable(name: &str) -> Diagnostic {
	runtime("RUNTIME_010", Severity::Application, format!("Unknown variable '{}'", name), None)
}

pub fn division_by_zero() -> Diagnostic {
	runtime("RUNTIME_011", Severity::Application, "Division by zero".to_string(), None)
}

pub fn numeric_overflow(operator: &str) -> Diagnostic {
	runtime("RUNTIME_012", Severity::Application, format!("Numeric overflow in '{}'", operator), None)
}

/// An error raised by user code through an error selector
pub fn raised(class: ErrorClass, code: impl Into<String>, message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: code.into(),
		class,
		severity: Severity::User,
		message: message.into(),
		help: None,
		notes: vec![],
		cause: None,
	}
}
