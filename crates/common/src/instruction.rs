//! Instruction lists for the sift virtual machine.
//!
//! A [`Code`] is an ordered sequence of [`Instr`] values. Each `Instr` is
//! one opcode together with its operand, so the sequence is always a whole
//! number of (opcode, operand) pairs by construction. Lists nest: the
//! short-circuiting logical instructions, `Conditional`, and `Closure`
//! bodies carry their own sub-lists, which is how lazy evaluation is
//! expressed. There are no jump offsets anywhere in this format.
//!
//! Executing a list always leaves exactly one value on the operand stack.
//! That invariant is maintained by the compiler and checked by
//! `sift-verifier`; the VM does not re-validate it.

use std::rc::Rc;

use crate::literal::Literal;
use crate::param::{DefaultExpr, Param, ParamKey};

/// An instruction list: the unit of compilation and execution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Code {
    /// The instructions, in execution order.
    pub instructions: Vec<Instr>,
}

/// A single instruction: opcode plus operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// Push a constant.
    Const(Literal),
    /// Push the value bound to a name; evaluation fails if the name is
    /// absent from every scope in the chain.
    Ident(String),
    /// Pop key and object, push the property value. Fails on a
    /// `null`/`undefined` base.
    Member,
    /// Like `Member`, but a `null`/`undefined` base yields `undefined`.
    /// Guards only this node, never the rest of the chain.
    OptionalMember,
    /// Duplicate the top of the active frame (receiver for method calls).
    Dup,
    /// Open a fresh operand frame (array elements, object entries, or
    /// call arguments accumulate there).
    Container,
    /// Close the active frame into an array value.
    Array,
    /// Close the active frame (alternating key/value slots) into an
    /// object value.
    Object,
    /// Pop an iterable and append its elements to the active frame.
    ArraySpread,
    /// Pop a value and append its entries (key, value, key, value, ...)
    /// to the active frame. `null`/`undefined` spread to nothing.
    ObjectSpread,
    /// Close the active frame into an argument list, pop the callee (and
    /// the receiver when `method`), push the call result.
    Call {
        /// Whether a receiver was duplicated below the callee.
        method: bool,
    },
    /// Like `Call`, but a `null`/`undefined` callee yields `undefined`.
    OptionalCall {
        /// Whether a receiver was duplicated below the callee.
        method: bool,
    },
    /// Pop one operand, apply the named unary operator table entry.
    Unary(String),
    /// Pop two operands, apply the named binary operator table entry.
    Binary(String),
    /// Pop the left value; if truthy, run the sub-list and push its
    /// result, otherwise push the left value back.
    And(Code),
    /// Pop the left value; if falsy, run the sub-list and push its
    /// result, otherwise push the left value back.
    Or(Code),
    /// Pop the left value; if `null`/`undefined`, run the sub-list and
    /// push its result, otherwise push the left value back.
    Coalesce(Code),
    /// Pop the test value and run exactly one branch sub-list.
    Conditional {
        /// Branch taken when the test is truthy.
        then_code: Code,
        /// Branch taken when the test is falsy.
        else_code: Code,
    },
    /// Push a closure value capturing the current scope.
    Closure(Rc<FuncDef>),
}

/// An arrow function: parameter patterns plus a compiled body.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    /// Parameter patterns, bound positionally at call time.
    pub params: Vec<Param>,
    /// The compiled expression body.
    pub body: Code,
}

impl Code {
    /// Create an empty instruction list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction.
    pub fn push(&mut self, instr: Instr) {
        self.instructions.push(instr);
    }

    /// Number of instructions in this list (not counting nested lists).
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the list has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Visit every instruction mutably, recursing into every nested
    /// sub-list: logical right-hand sides, conditional branches, closure
    /// bodies, parameter defaults, and computed parameter keys.
    ///
    /// This is the hook the path-expression rewrite uses to patch
    /// `Ident`/`Const` operands after compilation.
    ///
    /// Every closure definition in the list must be uniquely owned; a
    /// shared `Rc` cannot be borrowed mutably, so its body would be
    /// skipped. Freshly compiled lists satisfy this. Debug builds
    /// assert it.
    pub fn for_each_instr_mut<F: FnMut(&mut Instr)>(&mut self, f: &mut F) {
        for instr in &mut self.instructions {
            f(instr);
            match instr {
                Instr::And(code) | Instr::Or(code) | Instr::Coalesce(code) => {
                    code.for_each_instr_mut(f);
                }
                Instr::Conditional {
                    then_code,
                    else_code,
                } => {
                    then_code.for_each_instr_mut(f);
                    else_code.for_each_instr_mut(f);
                }
                Instr::Closure(def) => {
                    let def = Rc::get_mut(def);
                    debug_assert!(
                        def.is_some(),
                        "mutable walk over a shared closure definition"
                    );
                    if let Some(def) = def {
                        for param in &mut def.params {
                            visit_param(param, f);
                        }
                        def.body.for_each_instr_mut(f);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Recurse into the sub-lists embedded in a parameter pattern.
fn visit_param<F: FnMut(&mut Instr)>(param: &mut Param, f: &mut F) {
    match param {
        Param::Ident(_) => {}
        Param::Rest(inner) => visit_param(inner, f),
        Param::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                visit_param(element, f);
            }
        }
        Param::Object(entries) => {
            for entry in entries {
                if let ParamKey::Computed(code) = &mut entry.key {
                    code.for_each_instr_mut(f);
                }
                visit_param(&mut entry.value, f);
            }
        }
        Param::Default { inner, default } => {
            if let DefaultExpr::Code(code) = default {
                code.for_each_instr_mut(f);
            }
            visit_param(inner, f);
        }
    }
}

impl From<Vec<Instr>> for Code {
    fn from(instructions: Vec<Instr>) -> Self {
        Self { instructions }
    }
}
