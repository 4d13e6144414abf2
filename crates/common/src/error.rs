//! Runtime errors for sift expression evaluation.
//!
//! These are errors that can only happen while an instruction list is
//! executing, never at compile time. They propagate synchronously to the
//! caller of `run_in_new_context`; nothing is retried or logged internally.

use thiserror::Error;

/// Errors that occur during expression evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An identifier was not found in the scope chain or context.
    #[error("{name} is not defined")]
    UndefinedIdentifier { name: String },

    /// Property access on `null` or `undefined` through a non-optional
    /// member instruction.
    #[error("attempted to access property on {base}")]
    PropertyOnNil { base: &'static str },

    /// Call of a value that is not a function through a non-optional
    /// call instruction.
    #[error("attempted to invoke non-function (got {type_of})")]
    NotCallable { type_of: &'static str },

    /// Spread or array-destructuring target does not support iteration.
    #[error("{type_of} is not iterable")]
    NotIterable { type_of: &'static str },

    /// Coercion or operator failure (e.g. mixing BigInt and Number).
    #[error("type error: {message}")]
    Type { message: String },

    /// A `Unary`/`Binary` instruction named an operator that is not in
    /// the operator tables. The compiler rejects these, so this only
    /// fires for hand-built instruction lists.
    #[error("unknown operator '{op}'")]
    UnknownOperator { op: String },

    /// Closure recursion exceeded the call-depth limit.
    #[error("call depth exceeded limit {limit}")]
    CallDepthExceeded { limit: usize },

    /// Pop on an empty operand frame. The compiler never emits such a
    /// list; this only fires for hand-built instruction lists.
    #[error("operand stack underflow")]
    StackUnderflow,
}

impl RuntimeError {
    /// Shorthand for a [`RuntimeError::Type`] with a formatted message.
    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::Type {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_undefined_identifier() {
        let e = RuntimeError::UndefinedIdentifier {
            name: "price".to_string(),
        };
        assert_eq!(e.to_string(), "price is not defined");
    }

    #[test]
    fn display_property_on_nil() {
        let e = RuntimeError::PropertyOnNil { base: "null" };
        assert_eq!(e.to_string(), "attempted to access property on null");
    }

    #[test]
    fn display_not_callable() {
        let e = RuntimeError::NotCallable { type_of: "number" };
        assert_eq!(
            e.to_string(),
            "attempted to invoke non-function (got number)"
        );
    }

    #[test]
    fn display_type_error() {
        let e = RuntimeError::type_error("cannot mix BigInt and other types");
        assert_eq!(e.to_string(), "type error: cannot mix BigInt and other types");
    }

    #[test]
    fn error_clone_and_eq() {
        let e1 = RuntimeError::UnknownOperator {
            op: "instanceof".to_string(),
        };
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }
}
