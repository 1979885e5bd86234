//! Integer arithmetic and operand-order semantics.

use proptest::prelude::*;
use secd_foundation::Value;
use secd_machine::{CodeBuilder, Opcode};

use crate::{push_const, run};

fn binary_program(a: i64, b: i64, op: Opcode) -> Vec<i64> {
    let mut code = CodeBuilder::new();
    push_const(&mut code, a);
    push_const(&mut code, b);
    code.emit(op);
    code.emit(Opcode::Halt);
    code.into_words()
}

#[test]
fn push_two_push_three_add() {
    let result = run(binary_program(2, 3, Opcode::Add)).unwrap();
    assert_eq!(result, Value::Int(5));
}

#[test]
fn push_ten_push_four_sub() {
    let result = run(binary_program(10, 4, Opcode::Sub)).unwrap();
    assert_eq!(result, Value::Int(6));
}

#[test]
fn sub_is_not_commutative() {
    let result = run(binary_program(4, 10, Opcode::Sub)).unwrap();
    assert_eq!(result, Value::Int(-6));
}

#[test]
fn mul() {
    let result = run(binary_program(-3, 4, Opcode::Mul)).unwrap();
    assert_eq!(result, Value::Int(-12));
}

#[test]
fn nested_expression() {
    // (2 * 3) + (10 - 5)
    let mut code = CodeBuilder::new();
    push_const(&mut code, 2);
    push_const(&mut code, 3);
    code.emit(Opcode::Mul);
    push_const(&mut code, 10);
    push_const(&mut code, 5);
    code.emit(Opcode::Sub);
    code.emit(Opcode::Add);
    code.emit(Opcode::Halt);
    assert_eq!(run(code.into_words()).unwrap(), Value::Int(11));
}

#[test]
fn addition_wraps_on_overflow() {
    let result = run(binary_program(i64::MAX, 1, Opcode::Add)).unwrap();
    assert_eq!(result, Value::Int(i64::MIN));
}

proptest! {
    #[test]
    fn subtraction_operand_order(a in any::<i64>(), b in any::<i64>()) {
        let result = run(binary_program(a, b, Opcode::Sub)).unwrap();
        prop_assert_eq!(result, Value::Int(a.wrapping_sub(b)));
    }

    #[test]
    fn addition_is_commutative(a in any::<i64>(), b in any::<i64>()) {
        let ab = run(binary_program(a, b, Opcode::Add)).unwrap();
        let ba = run(binary_program(b, a, Opcode::Add)).unwrap();
        prop_assert_eq!(ab, ba);
    }
}
