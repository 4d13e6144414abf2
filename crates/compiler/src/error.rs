//! Compile-time errors.
//!
//! Parsing and compilation fail eagerly: a script that constructs
//! successfully can only fail at runtime, never because of its shape.

use thiserror::Error;

/// Errors produced while tokenizing or parsing source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at offset {at}")]
    UnexpectedChar { ch: char, at: usize },

    /// A string literal ran off the end of the input.
    #[error("unterminated string starting at offset {at}")]
    UnterminatedString { at: usize },

    /// A malformed numeric literal, e.g. a BigInt suffix on a fraction.
    #[error("invalid number at offset {at}")]
    InvalidNumber { at: usize },

    /// A malformed escape sequence inside a string literal.
    #[error("invalid escape sequence at offset {at}")]
    InvalidEscape { at: usize },

    /// A well-formed token in a position the grammar does not allow.
    #[error("unexpected token {token} at offset {at}")]
    UnexpectedToken { at: usize, token: String },

    /// Input ended in the middle of an expression.
    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// Errors produced while lowering a parsed expression to instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A syntactic form the expression subset deliberately excludes.
    #[error("unsupported expression: {kind}")]
    UnsupportedExpression { kind: &'static str },

    /// An operator with no entry in the operator tables.
    #[error("unsupported operator '{op}'")]
    UnsupportedOperator { op: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        let e = ParseError::UnexpectedChar { ch: '#', at: 3 };
        assert_eq!(e.to_string(), "unexpected character '#' at offset 3");
        let e = CompileError::UnsupportedExpression { kind: "assignment" };
        assert_eq!(e.to_string(), "unsupported expression: assignment");
        let e = CompileError::UnsupportedOperator {
            op: "instanceof".to_string(),
        };
        assert_eq!(e.to_string(), "unsupported operator 'instanceof'");
    }
}
