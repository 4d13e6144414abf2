//! Lowering from the syntax tree to instruction lists.
//!
//! Compilation is a single post-order walk. Laziness never uses jumps:
//! the right side of `&&`/`||`/`??`, both branches of `?:`, closure
//! bodies, and non-literal parameter defaults each compile into their
//! own nested sub-list that the VM runs only when needed.
//!
//! Assignment and sequence expressions parse but do not compile, and
//! an operator outside the operator tables is rejected here rather
//! than at runtime. A successfully compiled list therefore names only
//! table operators.

use std::rc::Rc;

use sift_common::{
    operators, Code, DefaultExpr, FuncDef, Instr, Literal, ObjectParamEntry, Param, ParamKey,
};

use crate::ast::{Arg, Element, Expr, LogicalOp, MemberProp, Pattern, PatternProp, Prop, PropKey};
use crate::error::CompileError;

/// Lower a parsed expression to an instruction list.
pub fn compile(expr: &Expr) -> Result<Code, CompileError> {
    let mut code = Code::new();
    emit(expr, &mut code)?;
    Ok(code)
}

fn emit(expr: &Expr, code: &mut Code) -> Result<(), CompileError> {
    match expr {
        Expr::Literal(literal) => code.push(Instr::Const(literal.clone())),
        Expr::Ident(name) => code.push(Instr::Ident(name.clone())),

        Expr::Member {
            object,
            property,
            optional,
        } => {
            emit(object, code)?;
            emit_member_key(property, code)?;
            code.push(if *optional {
                Instr::OptionalMember
            } else {
                Instr::Member
            });
        }

        Expr::Call {
            callee,
            args,
            optional,
        } => {
            // A member callee becomes a method call: the receiver is
            // duplicated underneath the resolved function so the VM can
            // pass it as `this`.
            let method = if let Expr::Member {
                object,
                property,
                optional: member_optional,
            } = callee.as_ref()
            {
                emit(object, code)?;
                code.push(Instr::Dup);
                emit_member_key(property, code)?;
                code.push(if *member_optional {
                    Instr::OptionalMember
                } else {
                    Instr::Member
                });
                true
            } else {
                emit(callee, code)?;
                false
            };
            code.push(Instr::Container);
            for arg in args {
                match arg {
                    Arg::Plain(expr) => emit(expr, code)?,
                    Arg::Spread(expr) => {
                        emit(expr, code)?;
                        code.push(Instr::ArraySpread);
                    }
                }
            }
            code.push(if *optional {
                Instr::OptionalCall { method }
            } else {
                Instr::Call { method }
            });
        }

        Expr::Array(elements) => {
            code.push(Instr::Container);
            for element in elements {
                match element {
                    Element::Hole => code.push(Instr::Const(Literal::Undefined)),
                    Element::Plain(expr) => emit(expr, code)?,
                    Element::Spread(expr) => {
                        emit(expr, code)?;
                        code.push(Instr::ArraySpread);
                    }
                }
            }
            code.push(Instr::Array);
        }

        Expr::Object(props) => {
            code.push(Instr::Container);
            for prop in props {
                match prop {
                    Prop::KeyValue { key, value } => {
                        emit_prop_key(key, code)?;
                        emit(value, code)?;
                    }
                    Prop::Spread(expr) => {
                        emit(expr, code)?;
                        code.push(Instr::ObjectSpread);
                    }
                }
            }
            code.push(Instr::Object);
        }

        Expr::Unary { op, operand } => {
            if operators::unary(op).is_none() {
                return Err(CompileError::UnsupportedOperator { op: op.clone() });
            }
            emit(operand, code)?;
            code.push(Instr::Unary(op.clone()));
        }

        Expr::Binary { op, left, right } => {
            if operators::binary(op).is_none() {
                return Err(CompileError::UnsupportedOperator { op: op.clone() });
            }
            emit(left, code)?;
            emit(right, code)?;
            code.push(Instr::Binary(op.clone()));
        }

        Expr::Logical { op, left, right } => {
            emit(left, code)?;
            let rhs = compile(right)?;
            code.push(match op {
                LogicalOp::And => Instr::And(rhs),
                LogicalOp::Or => Instr::Or(rhs),
                LogicalOp::Coalesce => Instr::Coalesce(rhs),
            });
        }

        Expr::Conditional { test, then, alt } => {
            emit(test, code)?;
            code.push(Instr::Conditional {
                then_code: compile(then)?,
                else_code: compile(alt)?,
            });
        }

        Expr::Arrow { params, body } => {
            let params = params
                .iter()
                .map(compile_pattern)
                .collect::<Result<Vec<_>, _>>()?;
            let body = compile(body)?;
            code.push(Instr::Closure(Rc::new(FuncDef { params, body })));
        }

        Expr::Assign { .. } => {
            return Err(CompileError::UnsupportedExpression { kind: "assignment" })
        }
        Expr::Sequence(_) => {
            return Err(CompileError::UnsupportedExpression {
                kind: "sequence expression",
            })
        }
    }
    Ok(())
}

fn emit_member_key(property: &MemberProp, code: &mut Code) -> Result<(), CompileError> {
    match property {
        MemberProp::Static(name) => {
            code.push(Instr::Const(Literal::Str(name.clone())));
            Ok(())
        }
        MemberProp::Computed(expr) => emit(expr, code),
    }
}

fn emit_prop_key(key: &PropKey, code: &mut Code) -> Result<(), CompileError> {
    match key {
        PropKey::Fixed(name) => {
            code.push(Instr::Const(Literal::Str(name.clone())));
            Ok(())
        }
        PropKey::Computed(expr) => emit(expr, code),
    }
}

fn compile_pattern(pattern: &Pattern) -> Result<Param, CompileError> {
    Ok(match pattern {
        Pattern::Ident(name) => Param::Ident(name.clone()),
        Pattern::Rest(inner) => Param::Rest(Box::new(compile_pattern(inner)?)),
        Pattern::Array(elements) => Param::Array(
            elements
                .iter()
                .map(|element| element.as_ref().map(compile_pattern).transpose())
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Pattern::Object(entries) => Param::Object(
            entries
                .iter()
                .map(compile_pattern_prop)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Pattern::Default { inner, default } => {
            // Literal defaults need no sub-list at bind time.
            let default = match default.as_ref() {
                Expr::Literal(literal) => DefaultExpr::Const(literal.clone()),
                other => DefaultExpr::Code(compile(other)?),
            };
            Param::Default {
                inner: Box::new(compile_pattern(inner)?),
                default,
            }
        }
    })
}

fn compile_pattern_prop(entry: &PatternProp) -> Result<ObjectParamEntry, CompileError> {
    let key = match &entry.key {
        PropKey::Fixed(name) => ParamKey::Fixed(name.clone()),
        PropKey::Computed(expr) => ParamKey::Computed(compile(expr)?),
    };
    Ok(ObjectParamEntry {
        key,
        value: compile_pattern(&entry.value)?,
    })
}
