// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use relcore_engine::{
	Database,
	test_utils::{create_test_database, create_test_process, create_test_table, stored_rows, test_row, test_table_builder},
};
use relcore_plan::{BinaryOp, Constraint, EventHandler, EventKind, Operator, PlanNode};
use relcore_type::{Type, Value};

fn name_not_empty() -> Constraint {
	Constraint::new(
		"NameNotEmpty",
		PlanNode::binary(BinaryOp::NotEqual, PlanNode::column(PlanNode::variable("value"), "Name"), PlanNode::literal("")),
	)
}

fn create_deferred_table(database: &Database) {
	database.create_table(test_table_builder().constraint(name_not_empty().deferred()).build()).unwrap();
}

#[test]
fn test_rollback_undoes_mutations() {
	let database = create_test_database();
	create_test_table(&database);
	let mut process = create_test_process(&database);
	process.insert("T", &test_row(1, Some("kept"))).unwrap();

	process.begin();
	process.insert("T", &test_row(2, None)).unwrap();
	process.update("T", &test_row(1, Some("kept")), &test_row(1, Some("changed"))).unwrap();
	process.delete("T", &test_row(2, None)).unwrap();
	process.rollback().unwrap();

	let rows = stored_rows(&database, "T");
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].get_by_name("Name"), Some(&Value::utf8("kept")));
	assert!(!process.in_transaction());
}

#[test]
fn test_nested_commit_merges_into_parent() {
	let database = create_test_database();
	create_test_table(&database);
	let mut process = create_test_process(&database);

	process.begin();
	process.begin();
	process.insert("T", &test_row(1, None)).unwrap();
	process.commit().unwrap();
	assert_eq!(process.transaction_depth(), 1);
	process.rollback().unwrap();

	assert!(stored_rows(&database, "T").is_empty());
}

#[test]
fn test_failed_statement_keeps_transaction_open() {
	let database = create_test_database();
	create_test_table(&database);
	let mut process = create_test_process(&database);

	process.begin();
	process.insert("T", &test_row(1, None)).unwrap();
	assert_eq!(process.insert("T", &test_row(1, None)).unwrap_err().code(), "CONSTRAINT_004");
	assert!(process.in_transaction());
	process.commit().unwrap();

	assert_eq!(stored_rows(&database, "T").len(), 1);
}

#[test]
fn test_commit_without_transaction() {
	let database = create_test_database();
	let mut process = create_test_process(&database);

	assert_eq!(process.commit().unwrap_err().code(), "TXN_001");
}

#[test]
fn test_deferred_constraint_checked_immediately_outside_transaction() {
	let database = create_test_database();
	create_deferred_table(&database);
	let mut process = create_test_process(&database);

	assert_eq!(process.insert("T", &test_row(1, Some(""))).unwrap_err().code(), "CONSTRAINT_001");
	assert!(stored_rows(&database, "T").is_empty());
}

#[test]
fn test_deferred_constraint_fails_at_commit() {
	let database = create_test_database();
	create_deferred_table(&database);
	let mut process = create_test_process(&database);

	process.begin();
	process.insert("T", &test_row(1, Some("ok"))).unwrap();
	assert!(process.insert("T", &test_row(2, Some(""))).unwrap());
	assert_eq!(stored_rows(&database, "T").len(), 2);

	let err = process.commit().unwrap_err();
	assert_eq!(err.code(), "TXN_002");
	assert_eq!(err.cause().map(|cause| cause.code().to_string()).as_deref(), Some("CONSTRAINT_001"));
	assert!(!process.in_transaction());
	assert!(stored_rows(&database, "T").is_empty());
}

#[test]
fn test_deferred_constraint_sees_repaired_row() {
	let database = create_test_database();
	create_deferred_table(&database);
	let mut process = create_test_process(&database);

	process.begin();
	process.insert("T", &test_row(1, Some(""))).unwrap();
	process.update("T", &test_row(1, Some("")), &test_row(1, Some("fixed"))).unwrap();
	process.commit().unwrap();

	let rows = stored_rows(&database, "T");
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].get_by_name("Name"), Some(&Value::utf8("fixed")));
}

#[test]
fn test_deferred_constraint_skips_deleted_row() {
	let database = create_test_database();
	create_deferred_table(&database);
	let mut process = create_test_process(&database);

	process.begin();
	process.insert("T", &test_row(1, Some(""))).unwrap();
	process.insert("T", &test_row(2, Some("ok"))).unwrap();
	process.delete("T", &test_row(1, Some(""))).unwrap();
	process.commit().unwrap();

	assert_eq!(stored_rows(&database, "T").len(), 1);
}

#[test]
fn test_deferred_constraint_sees_later_violation() {
	let database = create_test_database();
	create_deferred_table(&database);
	let mut process = create_test_process(&database);

	process.begin();
	process.insert("T", &test_row(1, Some("ok"))).unwrap();
	process.update("T", &test_row(1, Some("ok")), &test_row(1, Some(""))).unwrap();

	assert_eq!(process.commit().unwrap_err().code(), "TXN_002");
	assert!(stored_rows(&database, "T").is_empty());
}

#[test]
fn test_immediate_constraint_fails_at_statement() {
	let database = create_test_database();
	database.create_table(test_table_builder().constraint(name_not_empty()).build()).unwrap();
	let mut process = create_test_process(&database);

	process.begin();
	assert_eq!(process.insert("T", &test_row(1, Some(""))).unwrap_err().code(), "CONSTRAINT_001");
	process.commit().unwrap();
	assert!(stored_rows(&database, "T").is_empty());
}

#[test]
fn test_deferred_handler_runs_at_commit() {
	let calls = Arc::new(AtomicUsize::new(0));
	let counted = calls.clone();
	let audit = Arc::new(
		Operator::builder("Audit")
			.operand("Row", Type::Any)
			.native(move |_| {
				counted.fetch_add(1, Ordering::SeqCst);
				Ok(Value::Nil)
			})
			.build(),
	);
	let database = create_test_database();
	database
		.create_table(
			test_table_builder().handler(EventHandler::new("Audit", EventKind::AfterInsert, audit).deferred()).build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	process.begin();
	process.insert("T", &test_row(1, None)).unwrap();
	process.insert("T", &test_row(2, None)).unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 0);
	process.commit().unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 2);

	process.insert("T", &test_row(3, None)).unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_timeout_aborts_statement() {
	let database = create_test_database();
	let mut process = create_test_process(&database);
	let spin = PlanNode::while_loop(PlanNode::literal(true), PlanNode::block([]));

	let err = process.execute_with_timeout(&spin, Some(Duration::from_millis(50))).unwrap_err();
	assert_eq!(err.code(), "RUNTIME_006");
	assert_eq!(process.stack_depth(), 0);

	process.execute_with_timeout(&PlanNode::block([]), Some(Duration::from_secs(5))).unwrap();
}

#[test]
fn test_dropped_process_rolls_back() {
	let database = create_test_database();
	create_test_table(&database);
	{
		let mut process = create_test_process(&database);
		process.begin();
		process.insert("T", &test_row(1, None)).unwrap();
	}

	assert!(stored_rows(&database, "T").is_empty());
}
