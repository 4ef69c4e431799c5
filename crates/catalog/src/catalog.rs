// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use relcore_plan::{Constraint, Operator, ScalarType, TableVar};

pub mod constraint;
pub mod operator;
pub mod scalar;
pub mod table;
pub mod user;

use user::User;

pub const ADMIN: &str = "Admin";
pub const SYSTEM: &str = "System";

#[derive(Default)]
struct Registry {
	tables: IndexMap<String, Arc<TableVar>>,
	operators: IndexMap<String, Arc<Operator>>,
	scalar_types: IndexMap<String, Arc<ScalarType>>,
	constraints: IndexMap<String, Constraint>,
	users: IndexMap<String, User>,
}

/// The shared registry of catalog objects.
///
/// Structural mutation takes the write lock. Lookups use recursive reads so
/// a lookup performed while another lookup guard is alive on the same thread
/// cannot deadlock against a queued writer. Guards never escape this type:
/// every accessor clones the `Arc` out.
pub struct Catalog {
	registry: RwLock<Registry>,
}

impl Catalog {
	pub fn new() -> Self {
		let mut registry = Registry::default();
		registry.users.insert(SYSTEM.to_string(), User::admin(SYSTEM));
		registry.users.insert(ADMIN.to_string(), User::admin(ADMIN));
		Self {
			registry: RwLock::new(registry),
		}
	}

	fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
		let guard = self.registry.read_recursive();
		f(&guard)
	}

	fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
		let mut guard = self.registry.write();
		f(&mut guard)
	}
}

impl Default for Catalog {
	fn default() -> Self {
		Self::new()
	}
}
