//! Verification errors.

use thiserror::Error;

/// A defect found in an instruction list. `at` is the index of the
/// offending instruction within its own (possibly nested) list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// A `Container` was opened and never closed by `Array`, `Object`,
    /// or a call.
    #[error("container opened at index {at} is never closed")]
    UnmatchedContainer { at: usize },

    /// A closing or spread instruction ran with no open container.
    #[error("{opcode} at index {at} has no open container")]
    NoOpenContainer { at: usize, opcode: &'static str },

    /// An `Object` closed a frame holding an odd number of slots, so
    /// the key/value pairing is broken.
    #[error("object frame closed at index {at} holds {count} slots, expected an even number")]
    OddObjectFrame { at: usize, count: usize },

    /// An instruction pops more values than its frame can hold.
    #[error("stack underflow at index {at}")]
    StackUnderflow { at: usize },

    /// A list finished with a value count other than one.
    #[error("list leaves {count} values, expected exactly 1")]
    UnbalancedResult { count: usize },
}
