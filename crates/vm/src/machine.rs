//! The operand stack.
//!
//! A machine holds a stack of frames, each a vector of values. Running
//! a list pushes a base frame; `Container` opens further frames for
//! array, object, and argument construction. Each closure call gets a
//! fresh machine so no operand state leaks between calls; only
//! `call_depth` is inherited, to bound recursion.

use sift_common::{RuntimeError, Value};

/// Maximum closure call depth. Compiled lists cannot loop, so this
/// only limits recursion through self-referential contexts and
/// deeply nested closures.
pub const MAX_CALL_DEPTH: usize = 64;

/// An operand stack plus the current call depth.
#[derive(Debug, Default)]
pub struct Machine {
    frames: Vec<Vec<Value>>,
    pub(crate) call_depth: usize,
}

impl Machine {
    /// A machine at call depth zero.
    pub fn new() -> Self {
        Self::at_depth(0)
    }

    pub(crate) fn at_depth(call_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            call_depth,
        }
    }

    pub(crate) fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn open_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    pub(crate) fn close_frame(&mut self) -> Result<Vec<Value>, RuntimeError> {
        self.frames.pop().ok_or(RuntimeError::StackUnderflow)
    }

    pub(crate) fn truncate_frames(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    pub(crate) fn push(&mut self, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(value);
        }
    }

    pub(crate) fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.frames
            .last_mut()
            .and_then(|frame| frame.pop())
            .ok_or(RuntimeError::StackUnderflow)
    }

    pub(crate) fn peek(&self) -> Result<&Value, RuntimeError> {
        self.frames
            .last()
            .and_then(|frame| frame.last())
            .ok_or(RuntimeError::StackUnderflow)
    }

    /// Append values to the active frame, for spreads.
    pub(crate) fn extend(&mut self, values: impl IntoIterator<Item = Value>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.extend(values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_on_empty_machine_underflows() {
        let mut machine = Machine::new();
        assert_eq!(machine.pop(), Err(RuntimeError::StackUnderflow));
    }

    #[test]
    fn frames_are_independent() {
        let mut machine = Machine::new();
        machine.open_frame();
        machine.push(Value::Number(1.0));
        machine.open_frame();
        assert_eq!(machine.pop(), Err(RuntimeError::StackUnderflow));
        let _ = machine.close_frame();
        assert_eq!(machine.pop(), Ok(Value::Number(1.0)));
    }
}
