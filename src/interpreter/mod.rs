//! Quadruple execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`engine::Vm`] fetch-execute loop and execution history
//! - [`builtins`]: Intrinsics (`PARAM`, `print`, `println`, `GOTO`, `GOTOF`)
//! - [`ops`]: Pure unary and binary operator functions
//! - [`errors`]: Runtime error types
//! - [`constants`]: Address space layout and history defaults
//!
//! # Execution Model
//!
//! The loop fetches the instruction at the program counter, executes it against
//! the typed memory store, and either advances by one or follows the target
//! returned by a control-transfer intrinsic. It halts when the counter runs
//! past the end of the program or lands on an empty line. When history is
//! enabled a snapshot is taken before every step to enable time-travel
//! debugging.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod ops;
