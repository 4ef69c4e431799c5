// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_type::{
	Diagnostic, Error, IntoDiagnostic,
	error::diagnostic::{internal, runtime},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
	#[error("maximum stack depth of {max_depth} exceeded")]
	Overflow {
		max_depth: usize,
	},

	#[error("offset {offset} is outside of the current window of {window} slots")]
	OffsetOutOfWindow {
		offset: usize,
		window: usize,
	},

	#[error("window of {requested} slots requested but only {visible} are visible")]
	WindowTooLarge {
		requested: usize,
		visible: usize,
	},

	#[error("pop from an empty window")]
	Underflow,

	#[error("no {0} to pop")]
	Unbalanced(&'static str),
}

impl IntoDiagnostic for StackError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			StackError::Overflow {
				max_depth,
			} => runtime::stack_overflow(max_depth),
			StackError::OffsetOutOfWindow {
				offset,
				window,
			} => internal::offset_out_of_window(offset, window),
			other => internal::internal(format!("stack: {}", other)),
		}
	}
}

impl From<StackError> for Error {
	fn from(err: StackError) -> Self {
		Error(err.into_diagnostic())
	}
}
