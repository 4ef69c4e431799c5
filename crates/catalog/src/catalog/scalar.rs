// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::ScalarType;
use relcore_type::{Result, error::diagnostic::catalog::object_already_exists, return_error};

use crate::Catalog;

impl Catalog {
	pub fn create_scalar_type(&self, scalar_type: ScalarType) -> Result<Arc<ScalarType>> {
		self.write(|registry| {
			if registry.scalar_types.contains_key(&scalar_type.name) {
				return_error!(object_already_exists("Scalar type", &scalar_type.name));
			}
			let scalar_type = Arc::new(scalar_type);
			registry.scalar_types.insert(scalar_type.name.clone(), scalar_type.clone());
			Ok(scalar_type)
		})
	}

	pub fn find_scalar_type(&self, name: &str) -> Option<Arc<ScalarType>> {
		self.read(|registry| registry.scalar_types.get(name).cloned())
	}
}
