//! Runtime error types for the quadruple VM
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! while decoding or executing a quadruple program.
//!
//! All runtime errors are fatal - they halt execution and are handed back to the
//! caller instead of the output buffer. Errors raised below the execution loop
//! (memory store, parameter stack) do not know the program counter yet; the loop
//! attaches it with [`RuntimeError::at`] before propagating.

use crate::memory::value::{Address, Value};
use crate::memory::{DataType, ScopeSector};
use std::fmt;

/// Runtime errors that can occur during decoding or execution
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Address outside the defined address space
    InvalidAddress { address: Address, pc: Option<usize> },

    /// Read of a memory cell that was never written
    UninitializedAccess {
        address: Address,
        sector: ScopeSector,
        data_type: DataType,
        pc: Option<usize>,
    },

    /// `/` or `mod` with a zero divisor
    DivisionByZero {
        operation: String,
        dividend: Value,
        pc: Option<usize>,
    },

    /// Token matches neither an operator nor an intrinsic of that shape
    UnsupportedOperation {
        token: String,
        operands: usize,
        pc: Option<usize>,
    },

    /// Pop from an empty parameter stack
    StackUnderflow { pc: Option<usize> },

    /// Operator applied to value kinds it has no meaning for
    TypeMismatch {
        operation: String,
        operands: Vec<Value>,
        pc: Option<usize>,
    },

    /// Integer overflow in checked arithmetic
    IntegerOverflow {
        operation: String,
        pc: Option<usize>,
    },

    /// Operand token that is not a valid address or instruction index
    InvalidOperand { token: String, pc: Option<usize> },

    /// Jump target past the end of the program
    InvalidJumpTarget {
        target: usize,
        program_len: usize,
        pc: Option<usize>,
    },

    /// Run aborted by an external cancellation request
    Cancelled { pc: usize },

    /// Run exceeded the configured step budget
    StepLimitExceeded { limit: usize, pc: usize },

    /// Snapshot history limit exceeded
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History navigation failed (nothing recorded, already at an end)
    HistoryOperationFailed { message: String },
}

impl RuntimeError {
    /// Program counter of the faulting instruction, when known
    pub fn pc(&self) -> Option<usize> {
        match self {
            RuntimeError::InvalidAddress { pc, .. }
            | RuntimeError::UninitializedAccess { pc, .. }
            | RuntimeError::DivisionByZero { pc, .. }
            | RuntimeError::UnsupportedOperation { pc, .. }
            | RuntimeError::StackUnderflow { pc }
            | RuntimeError::TypeMismatch { pc, .. }
            | RuntimeError::IntegerOverflow { pc, .. }
            | RuntimeError::InvalidOperand { pc, .. }
            | RuntimeError::InvalidJumpTarget { pc, .. } => *pc,
            RuntimeError::Cancelled { pc } | RuntimeError::StepLimitExceeded { pc, .. } => {
                Some(*pc)
            }
            RuntimeError::SnapshotLimitExceeded { .. }
            | RuntimeError::HistoryOperationFailed { .. } => None,
        }
    }

    /// Attach the program counter if the error does not carry one yet
    pub fn at(mut self, at_pc: usize) -> Self {
        match &mut self {
            RuntimeError::InvalidAddress { pc, .. }
            | RuntimeError::UninitializedAccess { pc, .. }
            | RuntimeError::DivisionByZero { pc, .. }
            | RuntimeError::UnsupportedOperation { pc, .. }
            | RuntimeError::StackUnderflow { pc }
            | RuntimeError::TypeMismatch { pc, .. }
            | RuntimeError::IntegerOverflow { pc, .. }
            | RuntimeError::InvalidOperand { pc, .. }
            | RuntimeError::InvalidJumpTarget { pc, .. } => {
                if pc.is_none() {
                    *pc = Some(at_pc);
                }
            }
            _ => {}
        }
        self
    }

    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::InvalidAddress { .. } => "invalid-address",
            RuntimeError::UninitializedAccess { .. } => "uninitialized-access",
            RuntimeError::DivisionByZero { .. } => "division-by-zero",
            RuntimeError::UnsupportedOperation { .. } => "unsupported-operation",
            RuntimeError::StackUnderflow { .. } => "stack-underflow",
            RuntimeError::TypeMismatch { .. } => "type-mismatch",
            RuntimeError::IntegerOverflow { .. } => "integer-overflow",
            RuntimeError::InvalidOperand { .. } => "invalid-operand",
            RuntimeError::InvalidJumpTarget { .. } => "invalid-jump-target",
            RuntimeError::Cancelled { .. } => "cancelled",
            RuntimeError::StepLimitExceeded { .. } => "step-limit-exceeded",
            RuntimeError::SnapshotLimitExceeded { .. } => "snapshot-limit-exceeded",
            RuntimeError::HistoryOperationFailed { .. } => "history-operation-failed",
        }
    }
}

fn suffix(pc: &Option<usize>) -> String {
    match pc {
        Some(pc) => format!(" at instruction {}", pc),
        None => String::new(),
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::InvalidAddress { address, pc } => {
                write!(
                    f,
                    "Invalid address {} (outside the address space){}",
                    address,
                    suffix(pc)
                )
            }
            RuntimeError::UninitializedAccess {
                address,
                sector,
                data_type,
                pc,
            } => {
                write!(
                    f,
                    "Read from uninitialized {} {} cell {}{}",
                    sector,
                    data_type,
                    address,
                    suffix(pc)
                )
            }
            RuntimeError::DivisionByZero {
                operation,
                dividend,
                pc,
            } => {
                write!(
                    f,
                    "Division by zero: {} {} 0{}",
                    dividend,
                    operation,
                    suffix(pc)
                )
            }
            RuntimeError::UnsupportedOperation {
                token,
                operands,
                pc,
            } => {
                write!(
                    f,
                    "Unsupported operation '{}' with {} operand{}{}",
                    token,
                    operands,
                    if *operands == 1 { "" } else { "s" },
                    suffix(pc)
                )
            }
            RuntimeError::StackUnderflow { pc } => {
                write!(f, "Parameter stack underflow{}", suffix(pc))
            }
            RuntimeError::TypeMismatch {
                operation,
                operands,
                pc,
            } => {
                let shown: Vec<String> = operands.iter().map(|v| format!("{:?}", v)).collect();
                write!(
                    f,
                    "Type error: '{}' cannot be applied to {}{}",
                    operation,
                    shown.join(", "),
                    suffix(pc)
                )
            }
            RuntimeError::IntegerOverflow { operation, pc } => {
                write!(f, "Integer overflow in operation: {}{}", operation, suffix(pc))
            }
            RuntimeError::InvalidOperand { token, pc } => {
                write!(f, "Invalid operand '{}'{}", token, suffix(pc))
            }
            RuntimeError::InvalidJumpTarget {
                target,
                program_len,
                pc,
            } => {
                write!(
                    f,
                    "Jump target {} is past the end of a {}-instruction program{}",
                    target,
                    program_len,
                    suffix(pc)
                )
            }
            RuntimeError::Cancelled { pc } => {
                write!(f, "Execution cancelled before instruction {}", pc)
            }
            RuntimeError::StepLimitExceeded { limit, pc } => {
                write!(
                    f,
                    "Step limit of {} exceeded before instruction {}",
                    limit, pc
                )
            }
            RuntimeError::SnapshotLimitExceeded { current, limit } => {
                write!(
                    f,
                    "Snapshot memory limit exceeded: {} bytes used, limit is {}",
                    current, limit
                )
            }
            RuntimeError::HistoryOperationFailed { message } => {
                write!(f, "History operation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_keeps_first_pc() {
        let err = RuntimeError::StackUnderflow { pc: None }.at(4).at(9);
        assert_eq!(err.pc(), Some(4));
    }

    #[test]
    fn test_display_names_token() {
        let err = RuntimeError::UnsupportedOperation {
            token: "read".to_string(),
            operands: 1,
            pc: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported operation 'read' with 1 operand at instruction 2"
        );
        assert_eq!(err.kind(), "unsupported-operation");
    }

    #[test]
    fn test_division_message_reports_dividend() {
        let err = RuntimeError::DivisionByZero {
            operation: "/".to_string(),
            dividend: Value::Int(5),
            pc: Some(0),
        };
        assert!(err.to_string().contains("5 / 0"));
    }
}
