//! The eight end-to-end scenarios spelled out for the semantic pipeline,
//! plus the module-validity check every successful compile must satisfy.

use crate::utils::{compile_err, compile_ok};

fn assert_valid_module(bytes: &[u8]) {
    wasmparser::validate(bytes).unwrap_or_else(|e| panic!("emitted module failed validation: {e}"));
}

#[test]
fn unsigned_shift_compiles() {
    let (bytes, wat) = compile_ok("let a : u32 = 3 >> 4;");
    assert_valid_module(&bytes);
    assert!(wat.contains("i32.shr_u"), "expected an unsigned shift, got:\n{wat}");
}

#[test]
fn logical_and_on_default_int_literals_compiles() {
    let (bytes, _wat) = compile_ok("0 && 4;");
    assert_valid_module(&bytes);
}

#[test]
fn logical_and_on_float_is_invalid_operator() {
    let message = compile_err("let a : f32 = 0 && 4;");
    assert!(message.contains("invalid operator"), "{message}");
    assert!(message.contains("&&"), "{message}");
}

#[test]
fn float_argument_against_int_parameter_is_type_convert_error() {
    let message = compile_err("function foo(a:i32):void{} foo(1.5);");
    assert!(message.contains("cannot convert"), "{message}");
    assert!(message.contains("f32"), "{message}");
    assert!(message.contains("i32"), "{message}");
}

#[test]
fn duplicate_class_member_is_redefined_symbol() {
    let message = compile_err("class A { a:i32; a:f32; }");
    assert!(message.contains("already defined"), "{message}");
}

#[test]
fn self_recursive_class_member_is_rejected() {
    let message = compile_err("class A { a:A; }");
    assert!(message.contains("recursively contains itself"), "{message}");
}

#[test]
fn break_outside_loop_is_jump_statement_error() {
    let message = compile_err("while(1){} break;");
    assert!(message.contains("break"), "{message}");
    assert!(message.contains("outside any loop"), "{message}");
}

#[test]
fn disjoint_sibling_blocks_may_reuse_a_name() {
    let (bytes, _wat) =
        compile_ok("function foo():void{ { let i=0; } { let i=0; } }");
    assert_valid_module(&bytes);
}

#[test]
fn shadowing_an_enclosing_scope_is_redefined_symbol() {
    let message =
        compile_err("function foo():void{ let i=0; { let i=0; } { let i=0; } }");
    assert!(message.contains("already defined"), "{message}");
}

#[test]
fn prefix_not_on_float_is_invalid_operator() {
    let message = compile_err("let a:f32=0; not a;");
    assert!(message.contains("invalid operator"), "{message}");
    assert!(message.contains("not"), "{message}");
}

#[test]
fn binary_op_on_two_class_instances_is_invalid_operator() {
    let message = compile_err("class A { x:i32; } let a=A(); let b=A(); let c:i32=a+b;");
    assert!(message.contains("invalid operator"), "{message}");
    assert!(message.contains('A'), "{message}");
}

#[test]
fn a_full_function_with_call_and_control_flow_compiles() {
    let (bytes, wat) = compile_ok(
        r"
        function add(a: i32, b: i32): i32 {
            return a + b;
        }
        function main(): i32 {
            let total : i32 = 0;
            let i : i32 = 0;
            while (i < 10) {
                total = add(total, i);
                i = i + 1;
            }
            return total;
        }
        ",
    );
    assert_valid_module(&bytes);
    assert!(wat.contains("call"), "expected a call instruction, got:\n{wat}");
}
