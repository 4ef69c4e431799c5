// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use relcore_engine::test_utils::{
	create_test_database, create_test_process, create_test_table, stored_rows, test_row, test_table_builder,
};
use relcore_plan::{
	BinaryOp, Constraint, EventHandler, EventKind, Operator, PlanNode, ScalarType, TableVar, TableVarColumn,
};
use relcore_store::{Device, TableData};
use relcore_transaction::interceptor::table::{table_pre_insert, table_propose_insert};
use relcore_type::{Result, Row, Type, Value, error::diagnostic::internal::internal};

fn lit(value: impl Into<Value>) -> PlanNode {
	PlanNode::literal(value)
}

fn column(row: &str, name: &str) -> PlanNode {
	PlanNode::column(PlanNode::variable(row), name)
}

fn name_of(row: &Row) -> Value {
	row.get_by_name("Name").cloned().unwrap_or(Value::Nil)
}

/// Operator taking the row as a var operand and returning `verdict`.
fn row_handler(name: &str, verdict: bool, rename: Option<&'static str>) -> Arc<Operator> {
	Arc::new(
		Operator::builder(name)
			.var_operand("Row", Type::Any)
			.returns(Type::Boolean)
			.native(move |arguments| {
				if let (Some(rename), Some(row)) = (rename, arguments[0].as_row_mut()) {
					row.set_by_name("Name", Value::utf8(rename));
				}
				Ok(Value::Boolean(verdict))
			})
			.build(),
	)
}

#[test]
fn test_insert_statement_and_row_api() {
	let database = create_test_database();
	let table = create_test_table(&database);
	let mut process = create_test_process(&database);

	process.execute(&PlanNode::insert(table, PlanNode::row([("ID", lit(1)), ("Name", lit("a"))]))).unwrap();
	assert!(process.insert("T", &test_row(2, None)).unwrap());

	let rows = stored_rows(&database, "T");
	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0].get(0), &Value::int4(1));
	assert_eq!(name_of(&rows[0]), Value::utf8("a"));
	assert_eq!(name_of(&rows[1]), Value::Nil);
}

#[test]
fn test_insert_statement_is_atomic() {
	let database = create_test_database();
	let table = create_test_table(&database);
	let mut process = create_test_process(&database);

	let statement = PlanNode::block([
		PlanNode::insert(table.clone(), PlanNode::row([("ID", lit(1))])),
		PlanNode::insert(table, PlanNode::row([("ID", lit(1))])),
	]);

	let err = process.execute(&statement).unwrap_err();
	assert_eq!(err.code(), "CONSTRAINT_004");
	assert!(stored_rows(&database, "T").is_empty());
}

#[test]
fn test_missing_required_column() {
	let database = create_test_database();
	database.create_table(TableVar::builder("R").column("ID", Type::Int4).column("Name", Type::Utf8).key(&["ID"]).build()).unwrap();
	let mut process = create_test_process(&database);

	let err = process.insert("R", &Row::from_pairs([("ID", Value::int4(1))])).unwrap_err();
	assert_eq!(err.code(), "CONSTRAINT_005");
	assert!(stored_rows(&database, "R").is_empty());
}

#[test]
fn test_default_fills_unnamed_column_only() {
	let database = create_test_database();
	database
		.create_table(
			TableVar::builder("D")
				.column("ID", Type::Int4)
				.column_def(TableVarColumn::new("Name", Type::Utf8).nilable().with_default(lit("unnamed")))
				.key(&["ID"])
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	process.insert("D", &Row::from_pairs([("ID", Value::int4(1))])).unwrap();
	process.insert("D", &test_row(2, None)).unwrap();

	let rows = stored_rows(&database, "D");
	assert_eq!(name_of(&rows[0]), Value::utf8("unnamed"));
	assert_eq!(name_of(&rows[1]), Value::Nil);
}

#[test]
fn test_scalar_type_default_and_constraint() {
	let positive = Arc::new(
		ScalarType::new("Positive", Type::Int4)
			.with_default(lit(1))
			.with_constraint(
				Constraint::new("IsPositive", PlanNode::binary(BinaryOp::Greater, PlanNode::variable("value"), lit(0)))
					.with_message("quantity must be positive"),
			),
	);
	let database = create_test_database();
	database
		.create_table(
			TableVar::builder("Q")
				.column("ID", Type::Int4)
				.column_def(TableVarColumn::new("Qty", Type::Int4).with_domain(positive))
				.key(&["ID"])
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	process.insert("Q", &Row::from_pairs([("ID", Value::int4(1))])).unwrap();
	assert_eq!(stored_rows(&database, "Q")[0].get_by_name("Qty"), Some(&Value::int4(1)));

	let err = process.insert("Q", &Row::from_pairs([("ID", Value::int4(2)), ("Qty", Value::int4(-5))])).unwrap_err();
	assert_eq!(err.code(), "CONSTRAINT_006");
	assert_eq!(err.message(), "quantity must be positive");
}

#[test]
fn test_before_insert_handler_vetoes() {
	let database = create_test_database();
	database
		.create_table(
			test_table_builder()
				.handler(EventHandler::new("Refuse", EventKind::BeforeInsert, row_handler("Refuse", false, None)))
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	assert!(!process.insert("T", &test_row(1, Some("a"))).unwrap());
	assert!(stored_rows(&database, "T").is_empty());
}

#[test]
fn test_before_insert_handler_rewrites_row() {
	let database = create_test_database();
	database
		.create_table(
			test_table_builder()
				.handler(EventHandler::new(
					"Rename",
					EventKind::BeforeInsert,
					row_handler("Rename", true, Some("renamed")),
				))
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	assert!(process.insert("T", &test_row(1, Some("a"))).unwrap());
	assert_eq!(name_of(&stored_rows(&database, "T")[0]), Value::utf8("renamed"));
}

#[test]
fn test_after_handlers_run_once_per_row() {
	let calls = Arc::new(AtomicUsize::new(0));
	let counted = calls.clone();
	let counter = Arc::new(
		Operator::builder("Count")
			.operand("Row", Type::Any)
			.native(move |_| {
				counted.fetch_add(1, Ordering::SeqCst);
				Ok(Value::Nil)
			})
			.build(),
	);
	let database = create_test_database();
	let table = database
		.create_table(test_table_builder().handler(EventHandler::new("Count", EventKind::AfterInsert, counter)).build())
		.unwrap();
	let mut process = create_test_process(&database);

	process
		.execute(&PlanNode::block([
			PlanNode::insert(table.clone(), PlanNode::row([("ID", lit(1))])),
			PlanNode::insert(table, PlanNode::row([("ID", lit(2))])),
		]))
		.unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_column_validate_handler() {
	let upper = Arc::new(
		Operator::builder("Upper")
			.var_operand("Row", Type::Any)
			.operand("Column", Type::Utf8)
			.returns(Type::Boolean)
			.native(|arguments| {
				let column = arguments[1].as_str().unwrap_or_default().to_string();
				let Some(row) = arguments[0].as_row_mut() else {
					return Ok(Value::Boolean(false));
				};
				let upper = row.get_by_name(&column).and_then(|v| v.as_str()).map(str::to_uppercase);
				if let Some(upper) = upper {
					row.set_by_name(&column, Value::utf8(upper));
				}
				Ok(Value::Boolean(true))
			})
			.build(),
	);
	let database = create_test_database();
	database
		.create_table(
			TableVar::builder("V")
				.column("ID", Type::Int4)
				.column_def(
					TableVarColumn::new("Name", Type::Utf8)
						.nilable()
						.with_handler(EventHandler::new("Upper", EventKind::Validate, upper)),
				)
				.key(&["ID"])
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	process.insert("V", &test_row(1, Some("quiet"))).unwrap();
	assert_eq!(name_of(&stored_rows(&database, "V")[0]), Value::utf8("QUIET"));

	let old = stored_rows(&database, "V").remove(0);
	process.update("V", &old, &Row::from_pairs([("Name", Value::utf8("loud"))])).unwrap();
	assert_eq!(name_of(&stored_rows(&database, "V")[0]), Value::utf8("LOUD"));
}

#[test]
fn test_computed_column() {
	let database = create_test_database();
	database
		.create_table(
			TableVar::builder("C")
				.column("ID", Type::Int4)
				.column_def(
					TableVarColumn::new("Double", Type::Int4)
						.computed(PlanNode::binary(BinaryOp::Multiply, column("value", "ID"), lit(2))),
				)
				.key(&["ID"])
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	process.insert("C", &Row::from_pairs([("ID", Value::int4(21))])).unwrap();
	assert_eq!(stored_rows(&database, "C")[0].get_by_name("Double"), Some(&Value::int4(42)));
}

#[test]
fn test_row_constraint_rejects_insert() {
	let database = create_test_database();
	database
		.create_table(
			test_table_builder()
				.constraint(Constraint::new(
					"NameNotEmpty",
					PlanNode::binary(BinaryOp::NotEqual, column("value", "Name"), lit("")),
				))
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	assert!(process.insert("T", &test_row(1, None)).unwrap());
	let err = process.insert("T", &test_row(2, Some(""))).unwrap_err();
	assert_eq!(err.code(), "CONSTRAINT_001");
	assert_eq!(stored_rows(&database, "T").len(), 1);
}

#[test]
fn test_update_transition_constraint() {
	let database = create_test_database();
	database
		.create_table(
			test_table_builder()
				.update_constraint(Constraint::new("KeyFixed", PlanNode::eq(column("new", "ID"), column("old", "ID"))))
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);
	process.insert("T", &test_row(1, Some("a"))).unwrap();
	let old = stored_rows(&database, "T").remove(0);

	let err = process.update("T", &old, &test_row(2, Some("a"))).unwrap_err();
	assert_eq!(err.code(), "CONSTRAINT_002");

	assert!(process.update("T", &old, &test_row(1, Some("b"))).unwrap());
	assert_eq!(name_of(&stored_rows(&database, "T")[0]), Value::utf8("b"));
}

#[test]
fn test_update_and_delete_statements() {
	let database = create_test_database();
	let table = create_test_table(&database);
	let mut process = create_test_process(&database);
	for id in 1..=4 {
		process.insert("T", &test_row(id, Some("x"))).unwrap();
	}

	let is_even = PlanNode::eq(
		PlanNode::binary(
			BinaryOp::Subtract,
			column("value", "ID"),
			PlanNode::binary(BinaryOp::Multiply, PlanNode::binary(BinaryOp::Divide, column("value", "ID"), lit(2)), lit(2)),
		),
		lit(0),
	);
	process.execute(&PlanNode::update(table.clone(), Some(is_even), [("Name", lit("even"))])).unwrap();
	let names: Vec<_> = stored_rows(&database, "T").iter().map(name_of).collect();
	assert_eq!(names, vec![Value::utf8("x"), Value::utf8("even"), Value::utf8("x"), Value::utf8("even")]);

	process
		.execute(&PlanNode::delete(table, Some(PlanNode::eq(column("value", "Name"), lit("x")))))
		.unwrap();
	let ids: Vec<_> = stored_rows(&database, "T").iter().map(|r| r.get(0).clone()).collect();
	assert_eq!(ids, vec![Value::int4(2), Value::int4(4)]);
}

#[test]
fn test_update_unknown_column() {
	let database = create_test_database();
	let table = create_test_table(&database);
	let mut process = create_test_process(&database);
	process.insert("T", &test_row(1, None)).unwrap();

	let err = process.execute(&PlanNode::update(table, None, [("Missing", lit(1))])).unwrap_err();
	assert_eq!(err.code(), "CATALOG_003");
}

#[test]
fn test_optimistic_concurrency() {
	let database = create_test_database();
	create_test_table(&database);
	let mut first = create_test_process(&database);
	let mut second = create_test_process(&database);
	first.insert("T", &test_row(1, Some("a"))).unwrap();

	let seen = test_row(1, Some("a"));
	second.update_checked("T", &seen, &test_row(1, Some("b")), true).unwrap();

	let err = first.update_checked("T", &seen, &test_row(1, Some("c")), true).unwrap_err();
	assert_eq!(err.code(), "CONCURRENCY_002");
	assert_eq!(name_of(&stored_rows(&database, "T")[0]), Value::utf8("b"));

	let refreshed = stored_rows(&database, "T").remove(0);
	assert!(first.update_checked("T", &refreshed, &test_row(1, Some("c")), true).unwrap());
	assert_eq!(name_of(&stored_rows(&database, "T")[0]), Value::utf8("c"));

	let err = first.delete_checked("T", &test_row(9, None), true).unwrap_err();
	assert_eq!(err.code(), "CONCURRENCY_001");
}

#[test]
fn test_keyless_row_with_nil_is_reselected() {
	let database = create_test_database();
	database
		.create_table(TableVar::builder("K").column("ID", Type::Int4).nilable_column("Name", Type::Utf8).build())
		.unwrap();
	let mut process = create_test_process(&database);
	let unnamed = Row::from_pairs([("ID", Value::int4(1)), ("Name", Value::Nil)]);
	process.insert("K", &unnamed).unwrap();

	let named = Row::from_pairs([("ID", Value::int4(1)), ("Name", Value::utf8("x"))]);
	assert!(process.update_checked("K", &unnamed, &named, true).unwrap());
	assert_eq!(name_of(&stored_rows(&database, "K")[0]), Value::utf8("x"));

	assert!(process.update_checked("K", &named, &unnamed, true).unwrap());
	assert!(process.delete_checked("K", &unnamed, true).unwrap());
	assert!(stored_rows(&database, "K").is_empty());
}

#[test]
fn test_partial_old_row_is_reselected() {
	let database = create_test_database();
	create_test_table(&database);
	let mut process = create_test_process(&database);
	process.insert("T", &test_row(1, Some("a"))).unwrap();

	let key_only = Row::from_pairs([("ID", Value::int4(1))]);
	assert!(process.update("T", &key_only, &Row::from_pairs([("Name", Value::utf8("b"))])).unwrap());
	assert_eq!(name_of(&stored_rows(&database, "T")[0]), Value::utf8("b"));

	assert!(process.delete("T", &key_only).unwrap());
	assert!(stored_rows(&database, "T").is_empty());
}

#[test]
fn test_interceptors() {
	let database = create_test_database();
	create_test_table(&database);
	database.intercept(|interceptors| {
		interceptors.table_propose_insert.add(Arc::new(table_propose_insert(|ctx| {
			if !ctx.row.has_value(1) {
				ctx.row.set(1, Value::utf8("proposed"));
			}
			Ok(())
		})));
		interceptors.table_pre_insert.add(Arc::new(table_pre_insert(|ctx| {
			if ctx.row.get(0) == &Value::int4(13) {
				return Err(relcore_type::Error(internal("unlucky")));
			}
			Ok(())
		})));
	});
	let mut process = create_test_process(&database);

	process.insert("T", &test_row(1, None)).unwrap();
	assert_eq!(name_of(&stored_rows(&database, "T")[0]), Value::utf8("proposed"));

	assert!(process.insert("T", &test_row(13, Some("x"))).is_err());
	assert_eq!(stored_rows(&database, "T").len(), 1);
}

struct Refusing;

impl Device for Refusing {
	fn name(&self) -> &str {
		"refusing"
	}
}

struct Counting(AtomicUsize);

impl Device for Counting {
	fn name(&self) -> &str {
		"counting"
	}

	fn execute_insert(&self, data: &mut TableData, row: &Row) -> Result<bool> {
		data.insert(row)?;
		self.0.fetch_add(1, Ordering::SeqCst);
		Ok(true)
	}
}

#[test]
fn test_device_refusal_falls_back() {
	let database = create_test_database();
	create_test_table(&database);
	database.store().attach_device("T", Arc::new(Refusing)).unwrap();
	let mut process = create_test_process(&database);

	process.insert("T", &test_row(1, None)).unwrap();
	assert_eq!(stored_rows(&database, "T").len(), 1);
}

#[test]
fn test_device_executes_insert() {
	let database = create_test_database();
	create_test_table(&database);
	let device = Arc::new(Counting(AtomicUsize::new(0)));
	database.store().attach_device("T", device.clone()).unwrap();
	let mut process = create_test_process(&database);

	process.insert("T", &test_row(1, None)).unwrap();
	assert_eq!(device.0.load(Ordering::SeqCst), 1);
	assert_eq!(stored_rows(&database, "T").len(), 1);
}
