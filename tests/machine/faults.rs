//! Fault detection and reporting.

use secd_foundation::{ErrorKind, Segment};
use secd_machine::{CodeBuilder, Opcode};

use crate::{push_const, run};

#[test]
fn unrecognized_opcode_reports_value_and_position() {
    let mut code = CodeBuilder::new();
    push_const(&mut code, 1);
    code.emit_word(86);
    let err = run(code.into_words()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidOpcode { opcode: 86 }));
    assert_eq!(err.pc, Some(2));
}

#[test]
fn sub_on_a_single_operand_underflows() {
    let mut code = CodeBuilder::new();
    push_const(&mut code, 1);
    code.emit(Opcode::Sub);
    code.emit(Opcode::Halt);
    let err = run(code.into_words()).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::SegmentUnderflow {
            segment: Segment::Stack
        }
    ));
}

#[test]
fn halt_on_an_empty_stack_underflows() {
    let err = run(vec![Opcode::Halt.word()]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::SegmentUnderflow {
            segment: Segment::Stack
        }
    ));
}

#[test]
fn join_without_a_branch_underflows_the_dump() {
    let err = run(vec![Opcode::Join.word()]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::SegmentUnderflow {
            segment: Segment::Dump
        }
    ));
}

#[test]
fn rtn_without_a_call_underflows_the_dump() {
    let err = run(vec![Opcode::Rtn.word()]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::SegmentUnderflow {
            segment: Segment::Dump
        }
    ));
}

#[test]
fn join_on_a_call_frame_is_a_frame_mismatch() {
    // Apply a closure whose body Joins instead of Rtns.
    let mut code = CodeBuilder::new();
    code.emit(Opcode::Ldf);
    let body_ref = code.emit_word(0);
    push_const(&mut code, 1);
    code.emit(Opcode::Ap);
    code.emit(Opcode::Halt);

    let body_at = code.here();
    code.emit(Opcode::Join);

    code.patch(body_ref, body_at as i64);
    let err = run(code.into_words()).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::FrameMismatch {
            expected: "branch",
            found: "call"
        }
    ));
}

#[test]
fn closure_address_outside_code_is_reported() {
    let err = run(vec![Opcode::Ldf.word(), 50, Opcode::Halt.word()]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::PcOutOfRange { target: 50, .. }
    ));
}
