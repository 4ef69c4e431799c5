// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::Operator;
use relcore_type::{
	Result,
	error::diagnostic::catalog::{object_already_exists, operator_not_found},
	return_error,
};
use tracing::instrument;

use crate::Catalog;

impl Catalog {
	/// Registers `operator` after checking its declared characteristics
	/// against its body.
	#[instrument(name = "catalog::operator::create", level = "debug", skip(self, operator), fields(operator = %operator.name))]
	pub fn create_operator(&self, operator: Operator) -> Result<Arc<Operator>> {
		operator.validate_characteristics()?;
		self.write(|registry| {
			if registry.operators.contains_key(&operator.name) {
				return_error!(object_already_exists("Operator", &operator.name));
			}
			let operator = Arc::new(operator);
			registry.operators.insert(operator.name.clone(), operator.clone());
			Ok(operator)
		})
	}

	pub fn find_operator(&self, name: &str) -> Option<Arc<Operator>> {
		self.read(|registry| registry.operators.get(name).cloned())
	}

	pub fn operator(&self, name: &str) -> Result<Arc<Operator>> {
		match self.find_operator(name) {
			Some(operator) => Ok(operator),
			None => return_error!(operator_not_found(name)),
		}
	}
}

#[cfg(test)]
mod tests {
	use relcore_plan::{Operator, PlanNode};
	use relcore_type::Type;

	use crate::Catalog;

	#[test]
	fn test_create_operator_validates_characteristics() {
		let catalog = Catalog::new();
		let table = catalog
			.create_table(relcore_plan::TableVar::builder("T").column("ID", Type::Int4).build())
			.unwrap();
		let op = Operator::builder("Wipe")
			.body(PlanNode::delete(table, None))
			.characteristics(relcore_plan::Characteristics::default())
			.build();
		assert!(catalog.create_operator(op).is_err());
		assert!(catalog.find_operator("Wipe").is_none());
	}

	#[test]
	fn test_operator_lookup() {
		let catalog = Catalog::new();
		catalog.create_operator(Operator::builder("Noop").build()).unwrap();
		assert!(catalog.operator("Noop").is_ok());
		assert_eq!(catalog.operator("Missing").unwrap_err().code(), "CATALOG_002");
	}
}
