// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use parking_lot::RwLock;
use relcore_catalog::Catalog;
use relcore_plan::{Operator, TableVar};
use relcore_store::Store;
use relcore_transaction::{ApplicationTransaction, Interceptors};
use relcore_type::Result;
use tracing::{debug, instrument};

use crate::{EngineConfig, Process};

/// Everything processes of one database share.
pub struct Services {
	pub(crate) catalog: Catalog,
	pub(crate) store: Store,
	pub(crate) interceptors: RwLock<Interceptors>,
	pub(crate) config: EngineConfig,
}

impl Services {
	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	pub fn store(&self) -> &Store {
		&self.store
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}
}

/// A database: catalog, stored tables and the processes executing against
/// them. Cloning shares the same database.
#[derive(Clone)]
pub struct Database(Arc<Services>);

impl Database {
	pub fn new(config: EngineConfig) -> Self {
		debug!(?config, "database created");
		Self(Arc::new(Services {
			catalog: Catalog::new(),
			store: Store::new(),
			interceptors: RwLock::new(Interceptors::new()),
			config,
		}))
	}

	/// Registers `table` in the catalog and allocates its storage.
	#[instrument(name = "engine::database::create_table", level = "debug", skip_all, fields(table = %table.name))]
	pub fn create_table(&self, table: TableVar) -> Result<Arc<TableVar>> {
		let table = self.catalog.create_table(table)?;
		self.store.create(table.clone());
		Ok(table)
	}

	pub fn create_operator(&self, operator: Operator) -> Result<Arc<Operator>> {
		self.catalog.create_operator(operator)
	}

	/// Adds interceptors. Processes pick up the change on their next
	/// mutation.
	pub fn intercept(&self, f: impl FnOnce(&mut Interceptors)) {
		f(&mut self.interceptors.write());
	}

	/// Starts a process running as `user`.
	pub fn process(&self, user: &str) -> Result<Process> {
		let user = self.catalog.user(user)?;
		debug!(user = %user.name, "process started");
		Ok(Process::new(self.0.clone(), user))
	}

	pub fn begin_app_transaction(&self) -> ApplicationTransaction {
		let app = ApplicationTransaction::new();
		debug!(app = %app.id(), "application transaction started");
		app
	}
}

impl Default for Database {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}

impl Deref for Database {
	type Target = Services;

	fn deref(&self) -> &Services {
		&self.0
	}
}
