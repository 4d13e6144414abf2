//! Static checks for sift instruction lists.
//!
//! The compiler only emits balanced lists, so in the normal pipeline
//! this crate finds nothing. It exists for lists built by hand or
//! loaded from elsewhere: [`verify`] simulates frame counts and
//! reports every container mismatch, key/value pairing break, and
//! arity underflow it can find, not just the first.

mod balance;
pub mod error;

pub use error::VerifyError;

use sift_common::Code;

/// Verify one instruction list and everything nested inside it.
///
/// Returns all defects found. An empty `Ok(())` means the list cannot
/// underflow the operand stack and closes every container it opens.
pub fn verify(code: &Code) -> Result<(), Vec<VerifyError>> {
    let mut errors = Vec::new();
    balance::check_list(code, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_common::{Instr, Literal};

    #[test]
    fn empty_list_is_unbalanced() {
        let errors = verify(&Code::new()).unwrap_err();
        assert_eq!(errors, vec![VerifyError::UnbalancedResult { count: 0 }]);
    }

    #[test]
    fn single_const_is_balanced() {
        let code = Code::from(vec![Instr::Const(Literal::Num(1.0))]);
        assert!(verify(&code).is_ok());
    }
}
