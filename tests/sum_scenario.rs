//! End-to-end smoke test: build, verify, and run a two-argument add
//! through the interpreter backend.

use smiddy::{
    Context, EngineBackend, ExecutionEngine, GenericValue, Type, Value, VerifierFailureAction,
};

fn native_setup() {
    smiddy::link_in_interpreter();
    smiddy::initialize_native_target().expect("native target");
    smiddy::initialize_native_asm_printer().expect("native asm printer");
}

#[test]
fn test_sum_of_10_and_32_is_42() {
    native_setup();

    let context = Context::new();
    let module = context.create_module("sum_demo");
    let builder = context.create_builder();

    let i64_type = context.i64_type();
    let fn_type = Type::function(i64_type, &[i64_type, i64_type], false);
    let function = module.add_function("sum", fn_type);

    let entry = context.append_basic_block(function, "entry");
    builder.position_at_end(entry);

    let params = function.params();
    assert_eq!(params.len(), 2);
    let total = builder.build_add(params[0], params[1], "total");
    builder.build_ret(total);

    module
        .verify(VerifierFailureAction::ReturnStatus)
        .expect("sum module verifies cleanly");

    // Lookups happen before the module moves into the engine.
    let found = module.named_function("sum").expect("sum exists");
    assert_eq!(found, function);
    assert!(module.named_function("missing").is_none());

    let engine =
        ExecutionEngine::for_module(module, EngineBackend::Interpreter).expect("interpreter");

    let args = [
        GenericValue::from_int(i64_type, 10, true),
        GenericValue::from_int(i64_type, 32, true),
    ];
    let result = engine.run_function(function, &args);
    assert_eq!(result.to_int(true), 42);

    // Dropping only the engine releases the absorbed module too; the
    // original handle no longer exists to double-free it.
}

#[test]
fn test_call_with_no_arguments() {
    native_setup();

    let context = Context::new();
    let module = context.create_module("nullary_demo");
    let builder = context.create_builder();

    let i64_type = context.i64_type();

    // A zero-parameter callee; both its type construction and the call to
    // it cross the boundary with a null array pointer.
    let answer_type = Type::function(i64_type, &[], false);
    let answer = module.add_function("answer", answer_type);
    let answer_entry = context.append_basic_block(answer, "entry");
    builder.position_at_end(answer_entry);
    builder.build_ret(Value::const_int(i64_type, 42, true));

    let main_type = Type::function(i64_type, &[], false);
    let main_fn = module.add_function("call_answer", main_type);
    let main_entry = context.append_basic_block(main_fn, "entry");
    builder.position_at_end(main_entry);
    let result = builder.build_call(answer.global_value_type(), answer, &[], "result");
    builder.build_ret(result);

    module
        .verify(VerifierFailureAction::ReturnStatus)
        .expect("nullary module verifies cleanly");

    let engine = ExecutionEngine::interpreter(module).expect("interpreter");
    let result = engine.run_function(main_fn, &[]);
    assert_eq!(result.to_int(true), 42);
}
