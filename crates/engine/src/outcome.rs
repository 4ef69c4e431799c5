// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

/// How a statement finished. Errors travel on the `Err` side of
/// `Result<Outcome>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Normal,
	/// Caught by the nearest enclosing loop, which terminates.
	Break,
	/// Caught by the nearest enclosing loop, which moves to its next iteration.
	Continue,
	/// Caught by the nearest enclosing operator call, which completes.
	Exit,
}

impl Outcome {
	pub fn is_normal(&self) -> bool {
		matches!(self, Outcome::Normal)
	}
}

impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Outcome::Normal => f.write_str("normal"),
			Outcome::Break => f.write_str("break"),
			Outcome::Continue => f.write_str("continue"),
			Outcome::Exit => f.write_str("exit"),
		}
	}
}
