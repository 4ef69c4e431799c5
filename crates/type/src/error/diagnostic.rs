// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorClass, Severity};

pub mod catalog;
pub mod concurrency;
pub mod constraint;
pub mod internal;
pub mod runtime;
pub mod security;
pub mod transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub class: ErrorClass,
	pub severity: Severity,
	pub message: String,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl Diagnostic {
	pub fn to_json(&self) -> String {
		serde_json::to_string(self).unwrap_or_else(|_| self.code.clone())
	}
}

pub(crate) fn render(diagnostic: &Diagnostic) -> String {
	let mut out = String::new();
	let mut current = Some(diagnostic);
	let mut depth = 0;

	while let Some(d) = current {
		if depth > 0 {
			let _ = write!(out, "\n{}caused by: ", "  ".repeat(depth));
		}
		let _ = write!(out, "[{}] {}", d.code, d.message);
		if let Some(help) = &d.help {
			let _ = write!(out, "\n{}help: {}", "  ".repeat(depth + 1), help);
		}
		for note in &d.notes {
			let _ = write!(out, "\n{}note: {}", "  ".repeat(depth + 1), note);
		}
		current = d.cause.as_deref();
		depth += 1;
	}

	out
}
