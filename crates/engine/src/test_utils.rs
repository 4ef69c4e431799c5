// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_catalog::ADMIN;
use relcore_plan::{TableVar, TableVarBuilder};
use relcore_type::{Row, Type, Value};
use tracing_subscriber::{EnvFilter, fmt};

use crate::{Database, EngineConfig, Process};

/// Routes engine logs to the test harness. Filtered through `RUST_LOG`.
pub fn init_tracing() {
	let _ = fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

pub fn create_test_database() -> Database {
	create_test_database_with(EngineConfig::default())
}

pub fn create_test_database_with(config: EngineConfig) -> Database {
	init_tracing();
	Database::new(config)
}

pub fn create_test_process(database: &Database) -> Process {
	database.process(ADMIN).unwrap()
}

/// `T { ID: Int4, Name: nilable Utf8 }` keyed on `ID`.
pub fn test_table_builder() -> TableVarBuilder {
	TableVar::builder("T").column("ID", Type::Int4).nilable_column("Name", Type::Utf8).key(&["ID"])
}

pub fn create_test_table(database: &Database) -> Arc<TableVar> {
	database.create_table(test_table_builder().build()).unwrap()
}

pub fn test_row(id: i32, name: Option<&str>) -> Row {
	Row::from_pairs([("ID", Value::int4(id)), ("Name", name.map(Value::utf8).unwrap_or(Value::Nil))])
}

/// Stored rows of `table`, ordered by their first column.
pub fn stored_rows(database: &Database, table: &str) -> Vec<Row> {
	let mut rows = database.store().table(table).unwrap().scan();
	rows.sort_by(|l, r| l.get(0).sort_cmp(r.get(0)));
	rows
}
