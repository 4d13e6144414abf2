//! Runtime values and coercion rules.
//!
//! Values follow ECMAScript semantics for the expression subset the
//! compiler accepts: truthiness, ToNumber/ToString coercion, strict and
//! loose equality, and the Number/BigInt split. Arrays and objects are
//! reference types; cloning a `Value` shares the underlying storage.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::RuntimeError;
use crate::instruction::FuncDef;
use crate::scope::Scope;

/// A host function callable from expressions. Receives the receiver
/// (`undefined` for plain calls) and the argument list.
pub type NativeFn = Rc<dyn Fn(&Value, &[Value]) -> Result<Value, RuntimeError>>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    /// IEEE 754 double.
    Number(f64),
    /// Arbitrary-precision integer. Never mixes with `Number` in
    /// arithmetic.
    BigInt(BigInt),
    Str(String),
    /// Shared mutable array.
    Array(Rc<RefCell<Vec<Value>>>),
    /// Shared mutable object with insertion-ordered keys.
    Object(Rc<RefCell<IndexMap<String, Value>>>),
    /// An arrow function together with its captured scope.
    Function(Rc<Closure>),
    /// A host function supplied through the evaluation context.
    Native(NativeFn),
}

/// An arrow function value: its definition plus the scope it closed
/// over.
#[derive(Debug, Clone)]
pub struct Closure {
    pub def: Rc<FuncDef>,
    pub scope: Scope,
}

impl Value {
    /// Build an array value from elements.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Build an object value from entries.
    pub fn object(entries: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(entries)))
    }

    /// Wrap a host function as a callable value.
    pub fn native<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, RuntimeError> + 'static,
    {
        Value::Native(Rc::new(f))
    }

    /// The `typeof` string for this value. `null` reports `"object"`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::Str(_) => "string",
            Value::Array(_) | Value::Object(_) => "object",
            Value::Function(_) | Value::Native(_) => "function",
        }
    }

    /// True if the value is `null` or `undefined`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// ECMAScript truthiness. `false`, `0`, `NaN`, `0n`, `""`, `null`,
    /// and `undefined` are falsy; everything else, including empty
    /// arrays and objects, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(n) => !n.is_zero(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// ToPrimitive for arrays, objects, and functions; primitives pass
    /// through unchanged. There is no valueOf hook in this subset, so
    /// the result is always the ToString form.
    pub fn to_primitive(&self) -> Value {
        match self {
            Value::Array(elements) => {
                let elements = elements.borrow();
                let parts: Vec<String> = elements
                    .iter()
                    .map(|v| {
                        if v.is_nil() {
                            String::new()
                        } else {
                            v.to_js_string()
                        }
                    })
                    .collect();
                Value::Str(parts.join(","))
            }
            Value::Object(_) => Value::Str("[object Object]".to_string()),
            Value::Function(_) | Value::Native(_) => {
                Value::Str("function () { [native code] }".to_string())
            }
            other => other.clone(),
        }
    }

    /// ToNumber. BigInt refuses implicit conversion, matching the
    /// "cannot mix BigInt" rule.
    pub fn to_number(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Undefined => Ok(f64::NAN),
            Value::Null => Ok(0.0),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Ok(*n),
            Value::BigInt(_) => Err(RuntimeError::type_error(
                "cannot convert a BigInt to a number",
            )),
            Value::Str(s) => Ok(string_to_number(s)),
            other => other.to_primitive().to_number(),
        }
    }

    /// ToString.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::BigInt(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            other => match other.to_primitive() {
                Value::Str(s) => s,
                prim => prim.to_js_string(),
            },
        }
    }

    /// Strict equality (`===`). No coercion; `NaN` is unequal to
    /// itself; arrays, objects, and functions compare by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Loose equality (`==`) with the standard coercion ladder.
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            // Same type: strict rules apply.
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,

            (Value::Number(n), Value::Str(s)) | (Value::Str(s), Value::Number(n)) => {
                *n == string_to_number(s)
            }
            (Value::BigInt(n), Value::Str(s)) | (Value::Str(s), Value::BigInt(n)) => {
                match s.trim().parse::<BigInt>() {
                    Ok(parsed) => *n == parsed,
                    Err(_) => false,
                }
            }
            (Value::Number(n), Value::BigInt(b)) | (Value::BigInt(b), Value::Number(n)) => {
                n.fract() == 0.0 && n.is_finite() && b.to_f64().is_some_and(|bf| bf == *n)
            }
            (Value::Bool(b), other) | (other, Value::Bool(b)) => {
                Value::Number(if *b { 1.0 } else { 0.0 }).loose_equals(other)
            }
            // Two reference values compare by identity, not coercion.
            (
                Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_),
                Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_),
            ) => self.strict_equals(other),
            (obj @ (Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_)), prim)
            | (prim, obj @ (Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_)))
                if !prim.is_nil() =>
            {
                obj.to_primitive().loose_equals(prim)
            }
            _ => false,
        }
    }
}

/// ToNumber for strings: trimmed, empty means zero, hex prefixes
/// accepted, anything unparseable is `NaN`.
fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return match u128::from_str_radix(hex, 16) {
            Ok(n) => n as f64,
            Err(_) => f64::NAN,
        };
    }
    // Rust's parser accepts "inf"; ECMAScript does not.
    if trimmed.contains(['i', 'I']) {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Render a double the way ECMAScript ToString does for the common
/// cases: no trailing `.0` on integers, `NaN`, signed `Infinity`, and
/// both zeroes as `"0"`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{}", n as i128);
    }
    if n.abs() >= 1e21 {
        // ECMAScript switches to exponential notation here, with an
        // explicit sign on the exponent.
        let exp = format!("{n:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exp,
        };
    }
    format!("{n}")
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::BigInt(n) => write!(f, "BigInt({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(elements) => write!(f, "Array({:?})", elements.borrow()),
            Value::Object(entries) => write!(f, "Object({:?})", entries.borrow()),
            Value::Function(_) => write!(f, "Function"),
            Value::Native(_) => write!(f, "Native"),
        }
    }
}

/// Structural equality, used by tests and the instruction-list types.
/// Unlike [`Value::strict_equals`] this compares arrays and objects by
/// contents and treats `NaN` as equal to itself.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Signed helper used by the bitwise NOT operator on BigInt.
pub fn bigint_not(n: &BigInt) -> BigInt {
    -(n + BigInt::from(1))
}

/// True if the BigInt is negative. Thin wrapper so operator code does
/// not need a `num_traits` import of its own.
pub fn bigint_is_negative(n: &BigInt) -> bool {
    n.is_negative()
}
