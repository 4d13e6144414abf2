//! The operator tables.
//!
//! Every `Unary`/`Binary` instruction resolves its operator string here
//! at execution time. These tables are the only place expression code
//! can reach host behavior besides the natives supplied in the
//! evaluation context, so keeping them total over the compiler's
//! accepted operator set is what makes the sandbox airtight.
//!
//! Semantics follow ECMAScript: `+` prefers string concatenation,
//! bitwise operators work on 32-bit views of doubles, BigInt never
//! mixes implicitly with Number, and relational comparison of two
//! strings is lexicographic.

use std::collections::HashMap;

use num_bigint::BigInt;
use num_traits::{Pow, ToPrimitive, Zero};
use once_cell::sync::Lazy;

use crate::error::RuntimeError;
use crate::value::{bigint_is_negative, bigint_not, Value};

/// A binary operator implementation.
pub type BinaryFn = fn(&Value, &Value) -> Result<Value, RuntimeError>;

/// A unary operator implementation.
pub type UnaryFn = fn(&Value) -> Result<Value, RuntimeError>;

/// Look up a binary operator by its source spelling.
pub fn binary(op: &str) -> Option<BinaryFn> {
    BINARY.get(op).copied()
}

/// Look up a unary operator by its source spelling.
pub fn unary(op: &str) -> Option<UnaryFn> {
    UNARY.get(op).copied()
}

static BINARY: Lazy<HashMap<&'static str, BinaryFn>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, BinaryFn> = HashMap::new();
    table.insert("+", add);
    table.insert("-", |l, r| arith(l, r, |a, b| a - b, |a, b| Ok(a - b)));
    table.insert("*", |l, r| arith(l, r, |a, b| a * b, |a, b| Ok(a * b)));
    table.insert("/", |l, r| {
        arith(l, r, |a, b| a / b, |a, b| {
            if b.is_zero() {
                Err(RuntimeError::type_error("division by zero"))
            } else {
                Ok(a / b)
            }
        })
    });
    table.insert("%", |l, r| {
        arith(l, r, |a, b| a % b, |a, b| {
            if b.is_zero() {
                Err(RuntimeError::type_error("division by zero"))
            } else {
                Ok(a % b)
            }
        })
    });
    table.insert("**", pow);
    table.insert("==", |l, r| Ok(Value::Bool(l.loose_equals(r))));
    table.insert("!=", |l, r| Ok(Value::Bool(!l.loose_equals(r))));
    table.insert("===", |l, r| Ok(Value::Bool(l.strict_equals(r))));
    table.insert("!==", |l, r| Ok(Value::Bool(!l.strict_equals(r))));
    table.insert("<", |l, r| relational(l, r, |ord| ord.is_lt()));
    table.insert("<=", |l, r| relational(l, r, |ord| ord.is_le()));
    table.insert(">", |l, r| relational(l, r, |ord| ord.is_gt()));
    table.insert(">=", |l, r| relational(l, r, |ord| ord.is_ge()));
    table.insert("&", |l, r| bitwise(l, r, |a, b| a & b, |a, b| Ok(a & b)));
    table.insert("|", |l, r| bitwise(l, r, |a, b| a | b, |a, b| Ok(a | b)));
    table.insert("^", |l, r| bitwise(l, r, |a, b| a ^ b, |a, b| Ok(a ^ b)));
    table.insert("<<", shift_left);
    table.insert(">>", shift_right);
    table.insert(">>>", unsigned_shift_right);
    table.insert("in", has_property);
    table
});

static UNARY: Lazy<HashMap<&'static str, UnaryFn>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, UnaryFn> = HashMap::new();
    table.insert("-", negate);
    table.insert("+", to_number_op);
    table.insert("!", |v| Ok(Value::Bool(!v.is_truthy())));
    table.insert("~", bitwise_not);
    table.insert("typeof", |v| Ok(Value::Str(v.type_of().to_string())));
    table.insert("void", |_| Ok(Value::Undefined));
    table
});

/// The two numeric lanes after ToPrimitive.
enum NumericPair {
    Numbers(f64, f64),
    BigInts(BigInt, BigInt),
}

/// Coerce both operands to the same numeric lane. Mixing BigInt with
/// anything else is an error, matching ECMAScript.
fn numeric_pair(left: &Value, right: &Value) -> Result<NumericPair, RuntimeError> {
    let left = left.to_primitive();
    let right = right.to_primitive();
    match (&left, &right) {
        (Value::BigInt(a), Value::BigInt(b)) => Ok(NumericPair::BigInts(a.clone(), b.clone())),
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => Err(RuntimeError::type_error(
            "cannot mix BigInt and other types",
        )),
        _ => Ok(NumericPair::Numbers(left.to_number()?, right.to_number()?)),
    }
}

fn arith(
    left: &Value,
    right: &Value,
    nums: fn(f64, f64) -> f64,
    bigs: fn(&BigInt, &BigInt) -> Result<BigInt, RuntimeError>,
) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right)? {
        NumericPair::Numbers(a, b) => Ok(Value::Number(nums(a, b))),
        NumericPair::BigInts(a, b) => Ok(Value::BigInt(bigs(&a, &b)?)),
    }
}

/// `+` concatenates when either primitive is a string, otherwise adds
/// numerically.
fn add(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let left = left.to_primitive();
    let right = right.to_primitive();
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        return Ok(Value::Str(format!(
            "{}{}",
            left.to_js_string(),
            right.to_js_string()
        )));
    }
    arith(&left, &right, |a, b| a + b, |a, b| Ok(a + b))
}

fn pow(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right)? {
        NumericPair::Numbers(base, exp) => {
            // ECMAScript: |base| == 1 with an infinite exponent is NaN,
            // where IEEE powf would give 1.
            if exp.is_infinite() && base.abs() == 1.0 {
                return Ok(Value::Number(f64::NAN));
            }
            Ok(Value::Number(base.powf(exp)))
        }
        NumericPair::BigInts(base, exp) => {
            if bigint_is_negative(&exp) {
                return Err(RuntimeError::type_error(
                    "BigInt exponent must be non-negative",
                ));
            }
            let exp = exp
                .to_u64()
                .ok_or_else(|| RuntimeError::type_error("BigInt exponent too large"))?;
            Ok(Value::BigInt(Pow::pow(base, exp)))
        }
    }
}

fn relational(
    left: &Value,
    right: &Value,
    test: fn(std::cmp::Ordering) -> bool,
) -> Result<Value, RuntimeError> {
    let left = left.to_primitive();
    let right = right.to_primitive();
    if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
        return Ok(Value::Bool(test(a.cmp(b))));
    }
    let ordering = match (&left, &right) {
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::BigInt(a), other) => {
            let n = other.to_number()?;
            a.to_f64().and_then(|af| af.partial_cmp(&n))
        }
        (other, Value::BigInt(b)) => {
            let n = other.to_number()?;
            b.to_f64().and_then(|bf| n.partial_cmp(&bf))
        }
        (a, b) => a.to_number()?.partial_cmp(&b.to_number()?),
    };
    // NaN on either side makes every relational comparison false.
    Ok(Value::Bool(ordering.is_some_and(test)))
}

fn bitwise(
    left: &Value,
    right: &Value,
    ints: fn(i32, i32) -> i32,
    bigs: fn(&BigInt, &BigInt) -> Result<BigInt, RuntimeError>,
) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right)? {
        NumericPair::Numbers(a, b) => {
            Ok(Value::Number(ints(to_int32(a), to_int32(b)) as f64))
        }
        NumericPair::BigInts(a, b) => Ok(Value::BigInt(bigs(&a, &b)?)),
    }
}

fn shift_left(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right)? {
        NumericPair::Numbers(a, b) => {
            Ok(Value::Number((to_int32(a) << (to_uint32(b) & 31)) as f64))
        }
        NumericPair::BigInts(a, b) => bigint_shift(&a, &b, false),
    }
}

fn shift_right(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right)? {
        NumericPair::Numbers(a, b) => {
            Ok(Value::Number((to_int32(a) >> (to_uint32(b) & 31)) as f64))
        }
        NumericPair::BigInts(a, b) => bigint_shift(&a, &b, true),
    }
}

fn unsigned_shift_right(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right)? {
        NumericPair::Numbers(a, b) => {
            Ok(Value::Number((to_uint32(a) >> (to_uint32(b) & 31)) as f64))
        }
        NumericPair::BigInts(_, _) => Err(RuntimeError::type_error(
            "BigInts have no unsigned right shift",
        )),
    }
}

fn bigint_shift(value: &BigInt, amount: &BigInt, right: bool) -> Result<Value, RuntimeError> {
    let amount = amount
        .to_i64()
        .ok_or_else(|| RuntimeError::type_error("BigInt shift amount too large"))?;
    // A negative shift reverses direction, as in ECMAScript.
    let (magnitude, right) = if amount < 0 {
        (amount.unsigned_abs(), !right)
    } else {
        (amount as u64, right)
    };
    let shifted = if right {
        value >> magnitude
    } else {
        value << magnitude
    };
    Ok(Value::BigInt(shifted))
}

/// `key in target` for objects (key membership) and arrays (index
/// bounds or `length`).
fn has_property(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let key = left.to_js_string();
    match right {
        Value::Object(entries) => Ok(Value::Bool(entries.borrow().contains_key(&key))),
        Value::Array(elements) => {
            if key == "length" {
                return Ok(Value::Bool(true));
            }
            let in_bounds = key
                .parse::<usize>()
                .is_ok_and(|index| index < elements.borrow().len());
            Ok(Value::Bool(in_bounds))
        }
        other => Err(RuntimeError::type_error(format!(
            "cannot use 'in' operator on {}",
            other.type_of()
        ))),
    }
}

fn negate(value: &Value) -> Result<Value, RuntimeError> {
    match value.to_primitive() {
        Value::BigInt(n) => Ok(Value::BigInt(-n)),
        prim => Ok(Value::Number(-prim.to_number()?)),
    }
}

fn to_number_op(value: &Value) -> Result<Value, RuntimeError> {
    match value.to_primitive() {
        Value::BigInt(_) => Err(RuntimeError::type_error(
            "cannot convert a BigInt to a number",
        )),
        prim => Ok(Value::Number(prim.to_number()?)),
    }
}

fn bitwise_not(value: &Value) -> Result<Value, RuntimeError> {
    match value.to_primitive() {
        Value::BigInt(n) => Ok(Value::BigInt(bigint_not(&n))),
        prim => Ok(Value::Number(!to_int32(prim.to_number()?) as f64)),
    }
}

/// ToInt32: truncate, reduce modulo 2^32, reinterpret as signed.
fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// ToUint32: truncate and reduce modulo 2^32.
fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    n.trunc().rem_euclid(4294967296.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    fn big(n: i64) -> Value {
        Value::BigInt(BigInt::from(n))
    }

    fn apply(op: &str, l: Value, r: Value) -> Result<Value, RuntimeError> {
        binary(op).expect("operator present")(&l, &r)
    }

    #[test]
    fn add_prefers_concatenation() {
        assert_eq!(apply("+", num(1.0), s("2")).unwrap(), s("12"));
        assert_eq!(apply("+", s(""), Value::Bool(true)).unwrap(), s("true"));
        assert_eq!(
            apply("+", num(0.1), num(0.2)).unwrap(),
            num(0.30000000000000004)
        );
        assert_eq!(
            apply("+", Value::array(vec![num(1.0)]), num(2.0)).unwrap(),
            s("12")
        );
    }

    #[test]
    fn bigint_arithmetic_stays_exact() {
        assert_eq!(apply("%", big(7), big(2)).unwrap(), big(1));
        assert_eq!(apply("**", big(2), big(10)).unwrap(), big(1024));
        assert!(apply("/", big(1), big(0)).is_err());
        assert!(apply("+", big(1), num(1.0)).is_err());
    }

    #[test]
    fn bitwise_uses_int32_views() {
        assert_eq!(apply("&", num(6.0), num(3.0)).unwrap(), num(2.0));
        assert_eq!(apply("<<", num(1.0), num(33.0)).unwrap(), num(2.0));
        assert_eq!(apply(">>", num(-8.0), num(1.0)).unwrap(), num(-4.0));
        assert_eq!(
            apply(">>>", num(-1.0), num(0.0)).unwrap(),
            num(4294967295.0)
        );
        assert!(apply(">>>", big(1), big(1)).is_err());
    }

    #[test]
    fn relational_handles_strings_and_nan() {
        assert_eq!(apply("<", s("apple"), s("banana")).unwrap(), Value::Bool(true));
        assert_eq!(apply("<", s("10"), s("9")).unwrap(), Value::Bool(true));
        assert_eq!(
            apply("<", num(f64::NAN), num(1.0)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            apply(">=", num(f64::NAN), num(1.0)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(apply("<", big(2), num(3.0)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn in_operator() {
        let mut entries = indexmap::IndexMap::new();
        entries.insert("a".to_string(), num(1.0));
        let obj = Value::object(entries);
        assert_eq!(apply("in", s("a"), obj.clone()).unwrap(), Value::Bool(true));
        assert_eq!(apply("in", s("b"), obj).unwrap(), Value::Bool(false));
        let arr = Value::array(vec![num(1.0), num(2.0)]);
        assert_eq!(apply("in", num(1.0), arr.clone()).unwrap(), Value::Bool(true));
        assert_eq!(apply("in", num(2.0), arr.clone()).unwrap(), Value::Bool(false));
        assert_eq!(apply("in", s("length"), arr).unwrap(), Value::Bool(true));
        assert!(apply("in", s("a"), num(1.0)).is_err());
    }

    #[test]
    fn unary_table() {
        let apply1 = |op: &str, v: Value| unary(op).expect("operator present")(&v);
        assert_eq!(apply1("-", s("5")).unwrap(), num(-5.0));
        assert_eq!(apply1("!", num(0.0)).unwrap(), Value::Bool(true));
        assert_eq!(apply1("~", num(5.0)).unwrap(), num(-6.0));
        assert_eq!(apply1("~", big(5)).unwrap(), big(-6));
        assert_eq!(apply1("typeof", Value::Null).unwrap(), s("object"));
        assert_eq!(apply1("void", num(7.0)).unwrap(), Value::Undefined);
        assert!(apply1("+", big(1)).is_err());
    }

    #[test]
    fn pow_edge_cases() {
        assert!(matches!(
            apply("**", num(1.0), num(f64::INFINITY)).unwrap(),
            Value::Number(n) if n.is_nan()
        ));
        assert!(apply("**", big(2), big(-1)).is_err());
    }

    #[test]
    fn unknown_operator_is_absent() {
        assert!(binary("instanceof").is_none());
        assert!(unary("delete").is_none());
    }
}
