//! The public facade over the compiler and VM.
//!
//! A [`Script`] is an expression compiled once and evaluated any
//! number of times, each time against a fresh scope built from the
//! caller's context. Construction is the only place parse and compile
//! errors can surface; evaluation can only fail with a
//! [`RuntimeError`].
//!
//! [`PathScript`] layers path-expression syntax on top: the reserved
//! `@` character stands for the current value and `@path` for its
//! location.

mod path;

pub use path::PathScript;
pub use sift_common::{Context, RuntimeError, Value};
pub use sift_compiler::{CompileError, ParseError};

use std::fmt;

use sift_common::{Code, Scope};
use sift_compiler::{compile, parse};
use thiserror::Error;

/// Errors from building a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// A compiled expression.
#[derive(Debug, Clone)]
pub struct Script {
    source: String,
    code: Code,
}

impl Script {
    /// Parse and compile an expression. Everything the subset rejects
    /// fails here; a constructed script cannot fail structurally.
    pub fn new(source: &str) -> Result<Self, ScriptError> {
        let expr = parse(source)?;
        let code = compile(&expr)?;
        Ok(Self {
            source: source.to_string(),
            code,
        })
    }

    /// Evaluate against a fresh scope holding the given bindings.
    /// Evaluations share nothing; a context can be used concurrently
    /// with others.
    pub fn run_in_new_context(&self, context: &Context) -> Result<Value, RuntimeError> {
        sift_vm::execute(&self.code, &Scope::root(context.clone()))
    }

    /// The exact source text the script was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled instruction list.
    pub fn code(&self) -> &Code {
        &self.code
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_source() {
        let text = "current.price < 10";
        let script = Script::new(text).expect("script");
        assert_eq!(script.to_string(), text);
        assert_eq!(script.source(), text);
    }

    #[test]
    fn construction_errors_are_typed() {
        assert!(matches!(
            Script::new("1 +"),
            Err(ScriptError::Parse(_))
        ));
        assert!(matches!(
            Script::new("x = 5"),
            Err(ScriptError::Compile(CompileError::UnsupportedExpression {
                kind: "assignment"
            }))
        ));
    }
}
