//! Parameter stack
//!
//! `PARAM` pushes a value here and the zero-operand `print`/`println` forms
//! pop it again. Popping an empty stack is a front-end bug and surfaces as
//! [`RuntimeError::StackUnderflow`].

use super::value::Value;
use crate::interpreter::errors::RuntimeError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamStack {
    values: Vec<Value>,
}

impl ParamStack {
    pub fn new() -> Self {
        ParamStack { values: Vec::new() }
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Pop the most recently pushed value
    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.values
            .pop()
            .ok_or(RuntimeError::StackUnderflow { pc: None })
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Values bottom to top (for UI display)
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn depth(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn estimated_size(&self) -> usize {
        self.values.iter().map(Value::estimated_size).sum()
    }
}
