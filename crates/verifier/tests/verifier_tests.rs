//! Verifier tests over both compiled and hand-built lists.

use std::rc::Rc;

use sift_common::{Code, FuncDef, Instr, Literal, Param};
use sift_compiler::{compile, parse};
use sift_verifier::{verify, VerifyError};

fn compiled(source: &str) -> Code {
    compile(&parse(source).expect("parse failure")).expect("compile failure")
}

fn num(n: f64) -> Instr {
    Instr::Const(Literal::Num(n))
}

#[test]
fn compiled_expressions_always_verify() {
    for source in [
        "1",
        "current.price < 10",
        "a && b || c ?? d",
        "flag ? x : y",
        "[1, , 3, ...xs]",
        "{ a: 1, [k]: 2, ...rest }",
        "o.m?.(1, ...args)",
        "(a, { b = 1 }, [c], ...rest) => a + b + c",
        "xs.filter(x => x > 0).map(x => x * 2)",
    ] {
        assert_eq!(verify(&compiled(source)), Ok(()), "source: {source}");
    }
}

#[test]
fn unclosed_container_is_reported() {
    let code = Code::from(vec![Instr::Container, num(1.0)]);
    let errors = verify(&code).unwrap_err();
    assert!(errors.contains(&VerifyError::UnmatchedContainer { at: 0 }));
}

#[test]
fn close_without_open_is_reported() {
    let code = Code::from(vec![num(1.0), Instr::Array]);
    let errors = verify(&code).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, VerifyError::NoOpenContainer { at: 1, .. })));
}

#[test]
fn odd_object_frame_is_reported() {
    let code = Code::from(vec![
        Instr::Container,
        Instr::Const(Literal::Str("key".to_string())),
        Instr::Object,
    ]);
    let errors = verify(&code).unwrap_err();
    assert_eq!(errors, vec![VerifyError::OddObjectFrame { at: 2, count: 1 }]);
}

#[test]
fn binary_underflow_is_reported() {
    let code = Code::from(vec![num(1.0), Instr::Binary("+".to_string())]);
    let errors = verify(&code).unwrap_err();
    assert!(errors.contains(&VerifyError::StackUnderflow { at: 1 }));
}

#[test]
fn spread_makes_frame_count_unknown() {
    // After a spread the arg count is dynamic; the call must still
    // find its callee in the parent frame.
    let code = Code::from(vec![
        Instr::Ident("f".to_string()),
        Instr::Container,
        Instr::Ident("xs".to_string()),
        Instr::ArraySpread,
        Instr::Call { method: false },
    ]);
    assert_eq!(verify(&code), Ok(()));
}

#[test]
fn nested_branch_lists_are_checked() {
    let bad_branch = Code::from(vec![num(1.0), num(2.0)]);
    let code = Code::from(vec![
        num(0.0),
        Instr::Conditional {
            then_code: bad_branch,
            else_code: Code::from(vec![num(3.0)]),
        },
    ]);
    let errors = verify(&code).unwrap_err();
    assert_eq!(errors, vec![VerifyError::UnbalancedResult { count: 2 }]);
}

#[test]
fn closure_bodies_are_checked() {
    let def = FuncDef {
        params: vec![Param::Ident("x".to_string())],
        body: Code::new(),
    };
    let code = Code::from(vec![Instr::Closure(Rc::new(def))]);
    let errors = verify(&code).unwrap_err();
    assert_eq!(errors, vec![VerifyError::UnbalancedResult { count: 0 }]);
}

#[test]
fn multiple_defects_are_all_reported() {
    let code = Code::from(vec![
        Instr::Binary("+".to_string()),
        Instr::Container,
    ]);
    let errors = verify(&code).unwrap_err();
    assert!(errors.len() >= 2);
    assert!(errors.contains(&VerifyError::StackUnderflow { at: 0 }));
    assert!(errors.contains(&VerifyError::UnmatchedContainer { at: 1 }));
}
