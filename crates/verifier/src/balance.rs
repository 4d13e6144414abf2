//! Abstract stack simulation.
//!
//! Walks an instruction list the way the VM would, tracking only the
//! number of values in each operand frame. A frame count becomes
//! unknown after a spread, since spreads append a runtime-dependent
//! number of slots; unknown frames skip the arity checks but still
//! participate in open/close matching.
//!
//! Every nested sub-list is checked with the same rules, including
//! closure bodies, parameter defaults, and computed parameter keys:
//! each must leave exactly one value.

use sift_common::{Code, DefaultExpr, Instr, Param, ParamKey};

use crate::error::VerifyError;

/// One simulated operand frame. `opened_at` is `None` for the base
/// frame a list starts with.
struct Frame {
    count: Option<usize>,
    opened_at: Option<usize>,
}

/// Check one list and every list nested inside it, appending findings
/// to `errors`.
pub fn check_list(code: &Code, errors: &mut Vec<VerifyError>) {
    let mut frames = vec![Frame {
        count: Some(0),
        opened_at: None,
    }];

    for (at, instr) in code.instructions.iter().enumerate() {
        match instr {
            Instr::Const(_) | Instr::Ident(_) => push(&mut frames, 1),
            Instr::Member | Instr::OptionalMember => {
                pop(&mut frames, 2, at, errors);
                push(&mut frames, 1);
            }
            Instr::Dup => {
                pop(&mut frames, 1, at, errors);
                push(&mut frames, 2);
            }
            Instr::Container => frames.push(Frame {
                count: Some(0),
                opened_at: Some(at),
            }),
            Instr::Array => {
                if close(&mut frames, at, "ARRAY", errors).is_some() {
                    push(&mut frames, 1);
                }
            }
            Instr::Object => {
                if let Some(frame) = close(&mut frames, at, "OBJECT", errors) {
                    if let Some(count) = frame.count {
                        if count % 2 != 0 {
                            errors.push(VerifyError::OddObjectFrame { at, count });
                        }
                    }
                    push(&mut frames, 1);
                }
            }
            Instr::ArraySpread | Instr::ObjectSpread => {
                let opcode = if matches!(instr, Instr::ArraySpread) {
                    "SPREAD"
                } else {
                    "SPREAD-ENTRIES"
                };
                if frames.len() == 1 {
                    errors.push(VerifyError::NoOpenContainer { at, opcode });
                }
                pop(&mut frames, 1, at, errors);
                // Appends an unknown number of slots.
                if let Some(frame) = frames.last_mut() {
                    frame.count = None;
                }
            }
            Instr::Call { method } | Instr::OptionalCall { method } => {
                let opcode = "CALL";
                if close(&mut frames, at, opcode, errors).is_some() {
                    // Callee, plus the receiver for method calls.
                    let operands = if *method { 2 } else { 1 };
                    pop(&mut frames, operands, at, errors);
                    push(&mut frames, 1);
                }
            }
            Instr::Unary(_) => {
                pop(&mut frames, 1, at, errors);
                push(&mut frames, 1);
            }
            Instr::Binary(_) => {
                pop(&mut frames, 2, at, errors);
                push(&mut frames, 1);
            }
            Instr::And(sub) | Instr::Or(sub) | Instr::Coalesce(sub) => {
                pop(&mut frames, 1, at, errors);
                push(&mut frames, 1);
                check_list(sub, errors);
            }
            Instr::Conditional {
                then_code,
                else_code,
            } => {
                pop(&mut frames, 1, at, errors);
                push(&mut frames, 1);
                check_list(then_code, errors);
                check_list(else_code, errors);
            }
            Instr::Closure(def) => {
                push(&mut frames, 1);
                for param in &def.params {
                    check_param(param, errors);
                }
                check_list(&def.body, errors);
            }
        }
    }

    // Anything still open past the base frame is a defect.
    while frames.len() > 1 {
        let frame = frames.pop().filter(|f| f.opened_at.is_some());
        if let Some(frame) = frame {
            errors.push(VerifyError::UnmatchedContainer {
                at: frame.opened_at.unwrap_or(0),
            });
        }
    }
    if let Some(count) = frames[0].count {
        if count != 1 {
            errors.push(VerifyError::UnbalancedResult { count });
        }
    }
}

fn check_param(param: &Param, errors: &mut Vec<VerifyError>) {
    match param {
        Param::Ident(_) => {}
        Param::Rest(inner) => check_param(inner, errors),
        Param::Array(elements) => {
            for element in elements.iter().flatten() {
                check_param(element, errors);
            }
        }
        Param::Object(entries) => {
            for entry in entries {
                if let ParamKey::Computed(code) = &entry.key {
                    check_list(code, errors);
                }
                check_param(&entry.value, errors);
            }
        }
        Param::Default { inner, default } => {
            if let DefaultExpr::Code(code) = default {
                check_list(code, errors);
            }
            check_param(inner, errors);
        }
    }
}

fn push(frames: &mut [Frame], n: usize) {
    if let Some(frame) = frames.last_mut() {
        if let Some(count) = &mut frame.count {
            *count += n;
        }
    }
}

fn pop(frames: &mut [Frame], n: usize, at: usize, errors: &mut Vec<VerifyError>) {
    if let Some(frame) = frames.last_mut() {
        if let Some(count) = &mut frame.count {
            if *count < n {
                errors.push(VerifyError::StackUnderflow { at });
                *count = 0;
            } else {
                *count -= n;
            }
        }
    }
}

/// Close the active container frame. Reports and returns `None` if
/// only the base frame is open.
fn close(
    frames: &mut Vec<Frame>,
    at: usize,
    opcode: &'static str,
    errors: &mut Vec<VerifyError>,
) -> Option<Frame> {
    if frames.len() == 1 {
        errors.push(VerifyError::NoOpenContainer { at, opcode });
        return None;
    }
    frames.pop()
}
