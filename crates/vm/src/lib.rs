//! The sift virtual machine.
//!
//! Evaluates compiled instruction lists against a scope. The machine
//! is inert between evaluations: [`execute`] builds a fresh
//! [`Machine`], and every closure call inside an evaluation gets its
//! own machine too, so evaluations and calls cannot observe each
//! other's operand stacks.
//!
//! The only native code an evaluation can reach is the operator tables
//! in `sift-common` and whatever `Value::Native` callables the caller
//! put in scope.

mod bind;
mod execute;
mod machine;

pub use machine::{Machine, MAX_CALL_DEPTH};

use sift_common::{Code, RuntimeError, Scope, Value};

/// Evaluate one instruction list on a fresh machine.
pub fn execute(code: &Code, scope: &Scope) -> Result<Value, RuntimeError> {
    Machine::new().run(code, scope)
}
