//! Quadruple program loading
//!
//! This module turns the front end's output into something the VM can run:
//! - [`ast`]: Decoded instruction set ([`ast::Instruction`], [`ast::Program`])
//! - [`parser`]: Decoding of quadruple text or token lists into a program
//! - [`lexer`]: Tokenizer for constant table files
//! - [`constants`]: Constant table loader
//!
//! # Decoding
//!
//! Quadruples are decoded once, before execution. Operator and intrinsic
//! arity is a property of each definition, so the field count of a line
//! selects its form directly.

pub mod ast;
pub mod constants;
pub mod lexer;
pub mod parser;
