//! End-to-end compiler tests: source text in, instruction lists out.

use sift_common::{Code, Instr, Literal};
use sift_compiler::{compile, dump, parse, CompileError, ParseError};

fn compile_source(source: &str) -> Code {
    compile(&parse(source).expect("parse failure")).expect("compile failure")
}

#[test]
fn path_filter_shape() {
    // The motivating use case: a comparison against a context value.
    let code = compile_source("current.price < 10");
    assert_eq!(
        code.instructions,
        vec![
            Instr::Ident("current".to_string()),
            Instr::Const(Literal::Str("price".to_string())),
            Instr::Member,
            Instr::Const(Literal::Num(10.0)),
            Instr::Binary("<".to_string()),
        ]
    );
}

#[test]
fn conditional_compiles_both_branches_nested() {
    let code = compile_source("flag ? a + 1 : b * 2");
    assert_eq!(code.instructions.len(), 2);
    let Instr::Conditional {
        then_code,
        else_code,
    } = &code.instructions[1]
    else {
        panic!("expected Conditional");
    };
    assert_eq!(then_code.instructions.len(), 3);
    assert_eq!(else_code.instructions.len(), 3);
}

#[test]
fn chained_logical_operators_nest_rightward() {
    let code = compile_source("a || b || c");
    // (a || b) || c: the outer Or list holds c.
    let Instr::Or(outer) = &code.instructions[1] else {
        panic!("expected Or");
    };
    assert_eq!(outer.instructions, vec![Instr::Ident("b".to_string())]);
    let Instr::Or(last) = &code.instructions[2] else {
        panic!("expected trailing Or");
    };
    assert_eq!(last.instructions, vec![Instr::Ident("c".to_string())]);
}

#[test]
fn optional_call_keeps_method_flag() {
    let code = compile_source("o.m?.()");
    assert_eq!(
        code.instructions.last(),
        Some(&Instr::OptionalCall { method: true })
    );
    let code = compile_source("f?.()");
    assert_eq!(
        code.instructions.last(),
        Some(&Instr::OptionalCall { method: false })
    );
}

#[test]
fn computed_member_compiles_key_expression() {
    let code = compile_source("row[i + 1]");
    assert_eq!(
        code.instructions,
        vec![
            Instr::Ident("row".to_string()),
            Instr::Ident("i".to_string()),
            Instr::Const(Literal::Num(1.0)),
            Instr::Binary("+".to_string()),
            Instr::Member,
        ]
    );
}

#[test]
fn rejected_forms() {
    let assign = compile(&parse("x = 5").expect("parse"));
    assert_eq!(
        assign,
        Err(CompileError::UnsupportedExpression { kind: "assignment" })
    );
    let seq = compile(&parse("a, b").expect("parse"));
    assert_eq!(
        seq,
        Err(CompileError::UnsupportedExpression {
            kind: "sequence expression"
        })
    );
}

#[test]
fn parse_errors_carry_offsets() {
    assert_eq!(
        parse("1 + #"),
        Err(ParseError::UnexpectedChar { ch: '#', at: 4 })
    );
    assert!(matches!(
        parse("(a"),
        Err(ParseError::UnexpectedEof)
    ));
}

#[test]
fn bigint_literals_survive_lowering() {
    let code = compile_source("7n % 2n");
    assert!(matches!(
        code.instructions[0],
        Instr::Const(Literal::BigInt(_))
    ));
}

#[test]
fn dump_is_stable_for_nested_closures() {
    let code = compile_source("xs.filter(x => x > 0)");
    let text = dump(&code);
    assert!(text.contains("CALL-METHOD"));
    assert!(text.contains("CLOSURE (x)"));
    assert!(text.contains("BINARY >"));
}

#[test]
fn same_source_compiles_identically() {
    let a = compile_source("a?.b ?? [1, 2].length");
    let b = compile_source("a?.b ?? [1, 2].length");
    assert_eq!(a, b);
}
