// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relcore_catalog::User;
use relcore_engine::{
	EngineConfig,
	test_utils::{create_test_database, create_test_database_with, create_test_process},
};
use relcore_plan::{BinaryOp, Operator, PlanNode};
use relcore_type::{Type, Value};

fn increment(name: &str) -> PlanNode {
	PlanNode::assign(name, PlanNode::binary(BinaryOp::Add, PlanNode::variable(name), PlanNode::literal(1)))
}

#[test]
fn test_var_operand_written_back_to_caller_variable() {
	let database = create_test_database();
	let bump = database
		.create_operator(Operator::builder("Bump").var_operand("X", Type::Int4).body(increment("X")).build())
		.unwrap();
	database
		.create_operator(
			Operator::builder("Script")
				.returns(Type::Int4)
				.body(PlanNode::block([
					PlanNode::declare("N", Type::Int4, Some(PlanNode::literal(1))),
					PlanNode::statement(PlanNode::call(bump.clone(), [PlanNode::variable("N")])),
					PlanNode::statement(PlanNode::call(bump, [PlanNode::variable("N")])),
					PlanNode::assign("Result", PlanNode::variable("N")),
				]))
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	assert_eq!(process.call("Script", &mut []).unwrap(), Value::int4(3));
	assert_eq!(process.stack_depth(), 0);
}

#[test]
fn test_var_and_out_operands_written_back_to_arguments() {
	let database = create_test_database();
	database
		.create_operator(
			Operator::builder("Split")
				.var_operand("Count", Type::Int4)
				.out_operand("Label", Type::Utf8)
				.body(PlanNode::block([
					increment("Count"),
					PlanNode::assign("Label", PlanNode::literal("done")),
					PlanNode::Exit,
					PlanNode::assign("Label", PlanNode::literal("unreachable")),
				]))
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	let mut arguments = [Value::int4(41), Value::utf8("ignored")];
	process.call("Split", &mut arguments).unwrap();
	assert_eq!(arguments, [Value::int4(42), Value::utf8("done")]);
}

#[test]
fn test_native_operator_var_operand() {
	let database = create_test_database();
	database
		.create_operator(
			Operator::builder("Double")
				.var_operand("X", Type::Int4)
				.returns(Type::Boolean)
				.native(|arguments| {
					let doubled = arguments[0].as_i64().unwrap_or(0) * 2;
					arguments[0] = Value::int4(doubled as i32);
					Ok(Value::Boolean(true))
				})
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	let mut arguments = [Value::int4(21)];
	assert_eq!(process.call("Double", &mut arguments).unwrap(), Value::Boolean(true));
	assert_eq!(arguments[0], Value::int4(42));
}

#[test]
fn test_const_operand_cannot_be_assigned() {
	let database = create_test_database();
	let frozen = database
		.create_operator(Operator::builder("Frozen").const_operand("X", Type::Int4).body(increment("X")).build())
		.unwrap();
	database
		.create_operator(
			Operator::builder("Script")
				.body(PlanNode::block([
					PlanNode::declare("N", Type::Int4, Some(PlanNode::literal(1))),
					PlanNode::statement(PlanNode::call(frozen, [PlanNode::variable("N")])),
				]))
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	let err = process.call("Script", &mut []).unwrap_err();
	assert_eq!(err.code(), "RUNTIME_009");
	assert_eq!(process.stack_depth(), 0);
}

#[test]
fn test_const_operand_reads_caller_variable() {
	let database = create_test_database();
	let echo = database
		.create_operator(
			Operator::builder("Echo")
				.const_operand("X", Type::Int4)
				.returns(Type::Int4)
				.body(PlanNode::assign("Result", PlanNode::variable("X")))
				.build(),
		)
		.unwrap();
	database
		.create_operator(
			Operator::builder("Script")
				.returns(Type::Int4)
				.body(PlanNode::block([
					PlanNode::declare("N", Type::Int4, Some(PlanNode::literal(7))),
					PlanNode::assign("Result", PlanNode::call(echo, [PlanNode::variable("N")])),
				]))
				.build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	assert_eq!(process.call("Script", &mut []).unwrap(), Value::int4(7));
}

#[test]
fn test_execute_right_required() {
	let database = create_test_database();
	database.catalog().create_user(User::new("alice")).unwrap();
	database
		.create_operator(
			Operator::builder("Guarded")
				.execute_right("RunGuarded")
				.returns(Type::Int4)
				.body(PlanNode::assign("Result", PlanNode::literal(1)))
				.build(),
		)
		.unwrap();

	let mut alice = database.process("alice").unwrap();
	let err = alice.call("Guarded", &mut []).unwrap_err();
	assert_eq!(err.code(), "SECURITY_001");

	database.catalog().grant("alice", "RunGuarded").unwrap();
	let mut alice = database.process("alice").unwrap();
	assert_eq!(alice.call("Guarded", &mut []).unwrap(), Value::int4(1));
}

#[test]
fn test_call_depth_limit() {
	let database = create_test_database_with(EngineConfig::new().max_call_depth(8));
	database
		.create_operator(
			Operator::builder("Recurse").body(PlanNode::statement(PlanNode::call_named("Recurse", []))).build(),
		)
		.unwrap();
	let mut process = create_test_process(&database);

	let err = process.call("Recurse", &mut []).unwrap_err();
	assert_eq!(err.code(), "RUNTIME_004");
	assert_eq!(process.stack_depth(), 0);
}

#[test]
fn test_stack_overflow() {
	let database = create_test_database_with(EngineConfig::new().max_stack_depth(4));
	let declarations = (0..8).map(|i| PlanNode::declare(format!("V{}", i), Type::Int4, None));
	let mut process = create_test_process(&database);

	let err = process.execute(&PlanNode::block(declarations)).unwrap_err();
	assert_eq!(err.code(), "RUNTIME_003");
	assert_eq!(process.stack_depth(), 0);
}
