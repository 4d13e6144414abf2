//! Shared types for the sift expression engine.
//!
//! This crate defines everything the compiler, verifier, and VM agree
//! on:
//!
//! - [`Code`] and [`Instr`]: the nested instruction-list format
//! - [`Literal`] and [`Value`]: compile-time constants and runtime
//!   values, with ECMAScript coercion rules
//! - [`Param`]: arrow-function parameter patterns
//! - [`Scope`]: lexical scope chains closures capture
//! - [`operators`]: the unary and binary operator tables
//! - [`RuntimeError`]: everything evaluation can fail with

pub mod error;
pub mod instruction;
pub mod literal;
pub mod operators;
pub mod param;
pub mod scope;
pub mod value;

pub use error::RuntimeError;
pub use instruction::{Code, FuncDef, Instr};
pub use literal::Literal;
pub use param::{DefaultExpr, ObjectParamEntry, Param, ParamKey};
pub use scope::{Context, Scope};
pub use value::{Closure, NativeFn, Value};

#[cfg(test)]
mod proptests {
    use std::rc::Rc;

    use proptest::prelude::*;

    use crate::instruction::{Code, FuncDef, Instr};
    use crate::literal::Literal;
    use crate::param::{DefaultExpr, Param};

    fn arb_instr() -> impl Strategy<Value = Instr> {
        let leaf = prop_oneof![
            (-1.0e6..1.0e6f64).prop_map(|n| Instr::Const(Literal::Num(n))),
            "[a-z]{1,8}".prop_map(Instr::Ident),
            Just(Instr::Member),
            Just(Instr::Dup),
            Just(Instr::Container),
            Just(Instr::Array),
            Just(Instr::Call { method: false }),
            "[+*<-]".prop_map(Instr::Binary),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            let code = prop::collection::vec(inner.clone(), 0..4).prop_map(Code::from);
            prop_oneof![
                code.clone().prop_map(Instr::And),
                code.clone().prop_map(Instr::Or),
                code.clone().prop_map(Instr::Coalesce),
                (code.clone(), code.clone()).prop_map(|(then_code, else_code)| {
                    Instr::Conditional {
                        then_code,
                        else_code,
                    }
                }),
                (code.clone(), code).prop_map(|(default, body)| {
                    Instr::Closure(Rc::new(FuncDef {
                        params: vec![Param::Default {
                            inner: Box::new(Param::Ident("x".to_string())),
                            default: DefaultExpr::Code(default),
                        }],
                        body,
                    }))
                }),
            ]
        })
    }

    fn arb_code() -> impl Strategy<Value = Code> {
        prop::collection::vec(arb_instr(), 0..8).prop_map(Code::from)
    }

    /// Count every instruction reachable from a list, including all
    /// nested sub-lists, without going through `for_each_instr_mut`.
    fn count_instrs(code: &Code) -> usize {
        let mut total = 0;
        for instr in &code.instructions {
            total += 1;
            match instr {
                Instr::And(sub) | Instr::Or(sub) | Instr::Coalesce(sub) => {
                    total += count_instrs(sub);
                }
                Instr::Conditional {
                    then_code,
                    else_code,
                } => {
                    total += count_instrs(then_code) + count_instrs(else_code);
                }
                Instr::Closure(def) => {
                    for param in &def.params {
                        total += count_param(param);
                    }
                    total += count_instrs(&def.body);
                }
                _ => {}
            }
        }
        total
    }

    fn count_param(param: &Param) -> usize {
        match param {
            Param::Ident(_) => 0,
            Param::Rest(inner) => count_param(inner),
            Param::Array(elements) => elements.iter().flatten().map(count_param).sum(),
            Param::Object(entries) => entries
                .iter()
                .map(|e| {
                    let key = match &e.key {
                        crate::param::ParamKey::Computed(code) => count_instrs(code),
                        crate::param::ParamKey::Fixed(_) => 0,
                    };
                    key + count_param(&e.value)
                })
                .sum(),
            Param::Default { inner, default } => {
                let default = match default {
                    DefaultExpr::Code(code) => count_instrs(code),
                    DefaultExpr::Const(_) => 0,
                };
                default + count_param(inner)
            }
        }
    }

    proptest! {
        /// The mutable walk visits exactly the instructions a plain
        /// recursive count finds, in particular every nested sub-list.
        #[test]
        fn walk_visits_every_instruction(mut code in arb_code()) {
            let expected = count_instrs(&code);
            let mut visited = 0usize;
            code.for_each_instr_mut(&mut |_| visited += 1);
            prop_assert_eq!(visited, expected);
        }

        /// A walk that mutates nothing leaves the list unchanged.
        #[test]
        fn identity_walk_preserves_code(code in arb_code()) {
            let mut copy = code.clone();
            copy.for_each_instr_mut(&mut |_| {});
            prop_assert_eq!(copy, code);
        }
    }
}
