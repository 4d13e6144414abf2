//! Parameter binding patterns for arrow functions.
//!
//! Patterns are resolved at call time against the positional argument
//! list: identifiers bind directly, array and object patterns
//! destructure, defaults fill in for `undefined`, and a rest pattern
//! collects the remaining arguments or elements.

use crate::instruction::Code;
use crate::literal::Literal;

/// One parameter pattern of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Bind the argument to a single name.
    Ident(String),
    /// Collect the remaining arguments (or array elements) into a fresh
    /// array and bind the inner pattern to it.
    Rest(Box<Param>),
    /// Destructure array elements positionally. `None` entries are
    /// elision holes that consume a position without binding.
    Array(Vec<Option<Param>>),
    /// Destructure object properties by key.
    Object(Vec<ObjectParamEntry>),
    /// Bind the inner pattern, substituting the default when the
    /// incoming value is `undefined`.
    Default {
        inner: Box<Param>,
        default: DefaultExpr,
    },
}

/// One `key: pattern` entry of an object destructuring pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectParamEntry {
    pub key: ParamKey,
    pub value: Param,
}

/// The key of an object destructuring entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKey {
    /// Identifier or string key known at compile time.
    Fixed(String),
    /// `[expr]` key, evaluated at bind time.
    Computed(Code),
}

/// A parameter default. Literal defaults skip the sub-list entirely;
/// anything else is compiled and run lazily, only when the incoming
/// value is `undefined`.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultExpr {
    Const(Literal),
    Code(Code),
}
