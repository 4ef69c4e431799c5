// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_plan::Constraint;
use relcore_type::{Result, error::diagnostic::catalog::object_already_exists, return_error};

use crate::Catalog;

impl Catalog {
	/// Registers a database-wide constraint, checked after every mutation.
	pub fn create_constraint(&self, constraint: Constraint) -> Result<()> {
		self.write(|registry| {
			if registry.constraints.contains_key(&constraint.name) {
				return_error!(object_already_exists("Constraint", &constraint.name));
			}
			registry.constraints.insert(constraint.name.clone(), constraint);
			Ok(())
		})
	}

	pub fn constraints(&self) -> Vec<Constraint> {
		self.read(|registry| registry.constraints.values().cloned().collect())
	}
}
