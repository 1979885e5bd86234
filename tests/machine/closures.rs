//! Closure construction, application, and recursion.

use secd_foundation::Value;
use secd_machine::{CodeBuilder, Opcode};

use crate::{push_const, push_var, run};

#[test]
fn identity_closure_returns_its_argument() {
    let mut code = CodeBuilder::new();
    code.emit(Opcode::Ldf);
    let body_ref = code.emit_word(0);
    push_const(&mut code, 7);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Halt);

    let body_at = code.here();
    push_var(&mut code, 0);
    code.emit(Opcode::Rtn);

    code.patch(body_ref, body_at as i64);
    assert_eq!(run(code.into_words()).unwrap(), Value::Int(7));
}

#[test]
fn constant_closure_ignores_its_argument() {
    let mut code = CodeBuilder::new();
    code.emit(Opcode::Ldf);
    let body_ref = code.emit_word(0);
    push_const(&mut code, 99);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Halt);

    let body_at = code.here();
    push_const(&mut code, 11);
    code.emit(Opcode::Rtn);

    code.patch(body_ref, body_at as i64);
    assert_eq!(run(code.into_words()).unwrap(), Value::Int(11));
}

#[test]
fn apply_return_round_trip_restores_the_caller() {
    // 100 - f(1), f = λx. x + 1: the caller's pending operand and its
    // (empty) environment both survive the call.
    let mut code = CodeBuilder::new();
    push_const(&mut code, 100);
    code.emit(Opcode::Ldf);
    let body_ref = code.emit_word(0);
    push_const(&mut code, 1);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Sub);
    code.emit(Opcode::Halt);

    let body_at = code.here();
    push_var(&mut code, 0);
    push_const(&mut code, 1);
    code.emit(Opcode::Add);
    code.emit(Opcode::Rtn);

    code.patch(body_ref, body_at as i64);
    assert_eq!(run(code.into_words()).unwrap(), Value::Int(98));
}

#[test]
fn curried_application_captures_the_outer_argument() {
    // ((λx. λy. x - y) 10) 4
    let mut code = CodeBuilder::new();
    code.emit(Opcode::Ldf);
    let outer_ref = code.emit_word(0);
    push_const(&mut code, 10);
    code.emit(Opcode::Ap);
    push_const(&mut code, 4);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Halt);

    let outer_at = code.here();
    code.emit(Opcode::Ldf);
    let inner_ref = code.emit_word(0);
    code.emit(Opcode::Rtn);

    // inner body: env is [y, x]; compute x - y
    let inner_at = code.here();
    push_var(&mut code, 1);
    push_var(&mut code, 0);
    code.emit(Opcode::Sub);
    code.emit(Opcode::Rtn);

    code.patch(outer_ref, outer_at as i64);
    code.patch(inner_ref, inner_at as i64);
    assert_eq!(run(code.into_words()).unwrap(), Value::Int(6));
}

#[test]
fn argument_is_on_top_at_application_time() {
    // Caller pushes closure first, then the argument; the body sees the
    // argument at index 0.
    let mut code = CodeBuilder::new();
    code.emit(Opcode::Ldf);
    let body_ref = code.emit_word(0);
    push_const(&mut code, 21);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Halt);

    let body_at = code.here();
    push_var(&mut code, 0);
    push_var(&mut code, 0);
    code.emit(Opcode::Add);
    code.emit(Opcode::Rtn);

    code.patch(body_ref, body_at as i64);
    assert_eq!(run(code.into_words()).unwrap(), Value::Int(42));
}

/// `fact(n)` via `Ldrf`: index 0 is the argument, index 1 the function.
fn factorial_program(n: i64) -> Vec<i64> {
    let mut code = CodeBuilder::new();
    code.emit(Opcode::Ldrf);
    let body_ref = code.emit_word(0);
    push_const(&mut code, n);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Halt);

    let body_at = code.here();
    push_var(&mut code, 0);
    code.emit(Opcode::Sel);
    let then_ref = code.emit_word(0);
    let else_ref = code.emit_word(0);
    code.emit(Opcode::Rtn);

    let then_at = code.here();
    push_const(&mut code, 1);
    code.emit(Opcode::Join);

    let else_at = code.here();
    push_var(&mut code, 0);
    push_var(&mut code, 1);
    push_var(&mut code, 0);
    push_const(&mut code, 1);
    code.emit(Opcode::Sub);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Mul);
    code.emit(Opcode::Join);

    code.patch(body_ref, body_at as i64);
    code.patch(then_ref, then_at as i64);
    code.patch(else_ref, else_at as i64);
    code.into_words()
}

#[test]
fn recursive_factorial() {
    assert_eq!(run(factorial_program(0)).unwrap(), Value::Int(1));
    assert_eq!(run(factorial_program(1)).unwrap(), Value::Int(1));
    assert_eq!(run(factorial_program(6)).unwrap(), Value::Int(720));
}

#[test]
fn recursive_closure_can_return_itself() {
    // f = λx. f  (looked up at index 1 inside the body); applying f once
    // yields the closure itself.
    let mut code = CodeBuilder::new();
    code.emit(Opcode::Ldrf);
    let body_ref = code.emit_word(0);
    push_const(&mut code, 0);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Halt);

    let body_at = code.here();
    push_var(&mut code, 1);
    code.emit(Opcode::Rtn);

    code.patch(body_ref, body_at as i64);
    assert!(matches!(run(code.into_words()).unwrap(), Value::Closure(_)));
}
