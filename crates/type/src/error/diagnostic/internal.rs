// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Defects: inconsistencies between the compiled plan and the executor. These
//! are never caught by exception handlers.

use crate::error::{Diagnostic, ErrorClass, Severity};

fn defect(code: &str, message: String) -> Diagnostic {
	Diagnostic {
		code: code.to_string(),
		class: ErrorClass::Internal,
		severity: Severity::Fatal,
		message,
		help: Some("This is a bug, please report it".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn internal(message: impl Into<String>) -> Diagnostic {
	defect("INTERNAL_001", message.into())
}

pub fn unmatched_signal(signal: &str) -> Diagnostic {
	defect("INTERNAL_002", format!("{} escaped its enclosing boundary", signal))
}

pub fn offset_out_of_window(offset: usize, window: usize) -> Diagnostic {
	defect("INTERNAL_003", format!("Stack offset {} is outside of the current window of {} slots", offset, window))
}

pub fn stack_imbalance(expected: usize, actual: usize) -> Diagnostic {
	defect("INTERNAL_004", format!("Stack imbalance: expected depth {}, found {}", expected, actual))
}

pub fn missing_node_shape(what: &str) -> Diagnostic {
	defect("INTERNAL_005", format!("Plan node is missing its required shape: {}", what))
}
