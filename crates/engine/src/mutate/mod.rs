// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The table mutation pipeline. Each row-level insert, update and delete runs
//! a before phase (proposal, defaulting, handlers, validation, constraints),
//! an execute phase (device or internal fallback) and an after phase
//! (handlers, catalog constraints), all under a savepoint so that a failure
//! in any phase leaves the target table unchanged.

use relcore_plan::TableVar;
use relcore_type::{Result, Row};

use crate::Context;

mod concurrency;
mod constraint;
mod delete;
mod event;
mod insert;
mod physical;
mod protocol;
mod statement;
mod update;

impl Context {
	/// Runs `f` so that all of its effects are undone when it fails.
	pub(crate) fn atomically<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
		let savepoint = self.transactions.savepoint();
		match f(self) {
			Ok(result) => Ok(result),
			Err(err) => {
				self.transactions.rollback_to(savepoint);
				Err(err)
			}
		}
	}
}

/// Shapes `row` like the table's rows. Columns the caller did not supply are
/// taken from `seed` when given.
pub(crate) fn prepare_new_row(table: &TableVar, row: &Row, seed: Option<&Row>) -> Row {
	let mut prepared = Row::new(table.row_type.clone());
	if let Some(seed) = seed {
		seed.copy_into(&mut prepared);
	}
	row.copy_into(&mut prepared);
	prepared
}
