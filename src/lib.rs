//! # Introduction
//!
//! QuadVM is the execution backend of a small compiled language. It interprets
//! four-address intermediate instructions ("quadruples") against a segmented,
//! type-partitioned memory model, optionally capturing a snapshot of the full
//! machine state before each instruction. The snapshot history can then be
//! navigated forward and backward through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Quadruple text → Parser → Program ─┐
//! Constant table ────────────────────┴→ Vm → Output fragments (+ Snapshots → TUI)
//! ```
//!
//! 1. [`parser`]: decodes quadruples into a [`parser::ast::Program`] and loads
//!    constant tables.
//! 2. [`interpreter`]: the fetch-execute loop, operators and intrinsics.
//! 3. [`memory`]: the address space partition, the sparse typed
//!    [`memory::store::MemoryStore`] and the parameter stack.
//! 4. [`snapshot`]: the output buffer and the snapshot history with a
//!    configurable memory limit.
//! 5. [`ui`]: ratatui-based stepper; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use quadvm::memory::{store::ConstantTable, value::Value, DataType};
//!
//! let mut constants = ConstantTable::default();
//! let ints = constants.entry(DataType::Int).or_default();
//! ints.insert(200_000, Value::Int(5));
//! ints.insert(200_001, Value::Int(0));
//!
//! let output = quadvm::run_program("+ 200000 200001 50000\nprint 50000\n", constants).unwrap();
//! assert_eq!(output, vec!["5"]);
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;

use interpreter::engine::Vm;
use interpreter::errors::RuntimeError;
use memory::store::ConstantTable;
use parser::parser::Parser;

/// Decode `source` and run it once on a fresh VM
pub fn run_program(source: &str, constants: ConstantTable) -> Result<Vec<String>, RuntimeError> {
    let program = Parser::new(source).parse_program()?;
    Vm::new().run(program, constants)
}
