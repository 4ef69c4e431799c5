// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_type::{Result, Row};

use crate::TableData;

/// A physical executor offered each mutation before the engine's own
/// fallback. Returning `Ok(false)` refuses the mutation; the engine then
/// applies it to the generic representation itself.
pub trait Device: Send + Sync {
	fn name(&self) -> &str;

	fn execute_insert(&self, _data: &mut TableData, _row: &Row) -> Result<bool> {
		Ok(false)
	}

	fn execute_update(&self, _data: &mut TableData, _old: &Row, _new: &Row) -> Result<bool> {
		Ok(false)
	}

	fn execute_delete(&self, _data: &mut TableData, _old: &Row) -> Result<bool> {
		Ok(false)
	}
}
