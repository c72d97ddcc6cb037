//! Built-in intrinsic implementations
//!
//! This module provides the VM intrinsics that are not operators.
//!
//! # Supported Built-ins
//!
//! - `PARAM addr`: push `value(addr)` onto the parameter stack
//! - `print` / `println`: pop one parameter and append its text form
//! - `print addr` / `println addr`: append the text form of `value(addr)`
//! - `GOTO target`: jump to an instruction index
//! - `GOTOF cond target`: jump when `value(cond)` is falsy
//!
//! # Return Convention
//!
//! Each built-in returns `Some(pc)` to redirect the program counter or `None`
//! to fall through to the next instruction.

use crate::interpreter::engine::Vm;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Address;

impl Vm {
    pub(crate) fn builtin_param(&mut self, src: Address) -> Result<Option<usize>, RuntimeError> {
        let value = self.memory.read(src)?.clone();
        self.params.push(value);
        Ok(None)
    }

    pub(crate) fn builtin_print(
        &mut self,
        src: Option<Address>,
        newline: bool,
    ) -> Result<Option<usize>, RuntimeError> {
        let value = match src {
            Some(address) => self.memory.read(address)?.clone(),
            None => self.params.pop()?,
        };

        let mut text = value.to_string();
        if newline {
            text.push('\n');
        }
        self.output.print(text);
        Ok(None)
    }

    pub(crate) fn builtin_goto(&mut self, target: usize) -> Result<Option<usize>, RuntimeError> {
        Ok(Some(target))
    }

    pub(crate) fn builtin_gotof(
        &mut self,
        cond: Address,
        target: usize,
    ) -> Result<Option<usize>, RuntimeError> {
        if self.memory.read(cond)?.is_truthy() {
            Ok(None)
        } else {
            Ok(Some(target))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Vm;
    use crate::interpreter::errors::RuntimeError;
    use crate::memory::store::ConstantTable;
    use crate::memory::value::Value;
    use crate::memory::DataType;
    use crate::parser::parser::Parser;

    fn run(source: &str, constants: ConstantTable) -> Result<Vec<String>, RuntimeError> {
        let program = Parser::new(source).parse_program()?;
        Vm::new().run(program, constants)
    }

    fn constants() -> ConstantTable {
        let mut table = ConstantTable::default();
        table
            .entry(DataType::Int)
            .or_default()
            .insert(200_000, Value::Int(3));
        table
            .entry(DataType::Bool)
            .or_default()
            .extend([(220_000, Value::Bool(true)), (220_001, Value::Bool(false))]);
        table
            .entry(DataType::Str)
            .or_default()
            .insert(230_000, Value::Str("do".to_string()));
        table
    }

    #[test]
    fn test_param_then_print_pops() {
        let out = run("PARAM 200000\nPARAM 230000\nprint\nprintln\n", constants()).unwrap();
        assert_eq!(out, vec!["do", "3\n"]);
    }

    #[test]
    fn test_print_without_param_underflows() {
        let err = run("println\n", constants()).unwrap_err();
        assert_eq!(err, RuntimeError::StackUnderflow { pc: Some(0) });
    }

    #[test]
    fn test_gotof_jumps_only_when_false() {
        // falsy condition skips the print at index 1
        let out = run("GOTOF 220001 2\nprint 230000\nprint 200000\n", constants()).unwrap();
        assert_eq!(out, vec!["3"]);

        let out = run("GOTOF 220000 2\nprint 230000\nprint 200000\n", constants()).unwrap();
        assert_eq!(out, vec!["do", "3"]);
    }

    #[test]
    fn test_gotof_on_uninitialized_condition() {
        let err = run("GOTOF 90000 1\n", constants()).unwrap_err();
        assert!(matches!(err, RuntimeError::UninitializedAccess { .. }));
    }
}
