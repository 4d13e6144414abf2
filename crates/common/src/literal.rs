//! Compile-time constant values.
//!
//! A `Literal` is what a `Const` instruction carries as its operand. It is
//! converted to a runtime [`Value`](crate::value::Value) each time the
//! instruction executes, so one compiled list can be evaluated many times.

use core::fmt;

use num_bigint::BigInt;

use crate::value::Value;

/// A literal constant embedded in an instruction list.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// The `undefined` value.
    Undefined,
    /// The `null` value.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// IEEE 754 double, the only plain number representation.
    Num(f64),
    /// String literal, already unescaped.
    Str(String),
    /// Arbitrary-precision integer (`7n` syntax).
    BigInt(BigInt),
}

impl Literal {
    /// Materialize this literal as a runtime value.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Undefined => Value::Undefined,
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Num(n) => Value::Number(*n),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::BigInt(n) => Value::BigInt(n.clone()),
        }
    }
}

impl fmt::Display for Literal {
    /// Source-like rendering, used by the instruction dump.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Undefined => write!(f, "undefined"),
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Num(n) => write!(f, "{}", crate::value::number_to_string(*n)),
            Literal::Str(s) => write!(f, "{s:?}"),
            Literal::BigInt(n) => write!(f, "{n}n"),
        }
    }
}
