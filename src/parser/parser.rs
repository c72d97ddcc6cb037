//! Quadruple decoder
//!
//! Turns quadruple text (one instruction per line, whitespace-separated tokens)
//! or pre-tokenized quadruples into a [`Program`].
//!
//! # Dispatch Order
//!
//! For each line the operator table is consulted first, then the intrinsic
//! table. The number of operands selects the form:
//!
//! - 3 operands: binary operator
//! - 2 operands: unary operator, or `GOTOF`
//! - 1 operand: `PARAM`, `GOTO`, `print`/`println` of an address
//! - 0 operands: `print`/`println` popping the parameter stack
//!
//! A token with no form of the given shape is an unsupported operation.

use super::ast::{BinaryOp, Instruction, Intrinsic, Program, UnaryOp};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Address;

/// Decoder over the lines of a quadruple program
pub struct Parser {
    lines: Vec<Vec<String>>,
}

impl Parser {
    /// Split program text into tokenized lines.
    ///
    /// A trailing newline does not produce an extra instruction. Blank lines
    /// elsewhere decode to [`Instruction::Halt`].
    pub fn new(source: &str) -> Self {
        let mut lines: Vec<Vec<String>> = source
            .split('\n')
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect();

        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        Parser { lines }
    }

    /// Use quadruples that are already split into tokens
    pub fn from_quadruples<S: AsRef<str>>(quadruples: &[Vec<S>]) -> Self {
        let lines = quadruples
            .iter()
            .map(|q| q.iter().map(|t| t.as_ref().to_string()).collect())
            .collect();
        Parser { lines }
    }

    /// Use one string per quadruple
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let lines = lines
            .iter()
            .map(|l| l.as_ref().split_whitespace().map(str::to_string).collect())
            .collect();
        Parser { lines }
    }

    /// Decode every line and validate jump targets
    pub fn parse_program(&mut self) -> Result<Program, RuntimeError> {
        let mut instructions = Vec::with_capacity(self.lines.len());
        for (pc, tokens) in self.lines.iter().enumerate() {
            let instruction = decode(tokens.as_slice()).map_err(|e| e.at(pc))?;
            instructions.push(instruction);
        }

        let program_len = instructions.len();
        for (pc, instruction) in instructions.iter().enumerate() {
            if let Some(target) = instruction.jump_target() {
                if target > program_len {
                    return Err(RuntimeError::InvalidJumpTarget {
                        target,
                        program_len,
                        pc: Some(pc),
                    });
                }
            }
        }

        Ok(Program::new(instructions))
    }
}

/// Decode a single tokenized quadruple
pub fn decode<T: AsRef<str>>(tokens: &[T]) -> Result<Instruction, RuntimeError> {
    let Some((head, operands)) = tokens.split_first() else {
        return Ok(Instruction::Halt);
    };
    let head = head.as_ref();

    match operands {
        [lhs, rhs, dst] => {
            if let Some(op) = BinaryOp::from_token(head) {
                return Ok(Instruction::Binary {
                    op,
                    lhs: address(lhs)?,
                    rhs: address(rhs)?,
                    dst: address(dst)?,
                });
            }
        }
        [src, dst] => {
            if let Some(op) = UnaryOp::from_token(head) {
                return Ok(Instruction::Unary {
                    op,
                    src: address(src)?,
                    dst: address(dst)?,
                });
            }
        }
        _ => {}
    }

    let intrinsic = Intrinsic::from_token(head)
        .filter(|i| i.arities().contains(&operands.len()))
        .ok_or_else(|| RuntimeError::UnsupportedOperation {
            token: head.to_string(),
            operands: operands.len(),
            pc: None,
        })?;

    let instruction = match (intrinsic, operands) {
        (Intrinsic::Param, [src]) => Instruction::Param { src: address(src)? },
        (Intrinsic::Print, [src]) => Instruction::Print {
            src: Some(address(src)?),
            newline: false,
        },
        (Intrinsic::Print, []) => Instruction::Print {
            src: None,
            newline: false,
        },
        (Intrinsic::Println, [src]) => Instruction::Print {
            src: Some(address(src)?),
            newline: true,
        },
        (Intrinsic::Println, []) => Instruction::Print {
            src: None,
            newline: true,
        },
        (Intrinsic::Goto, [target]) => Instruction::Goto {
            target: jump_target(target)?,
        },
        (Intrinsic::GotoF, [cond, target]) => Instruction::GotoF {
            cond: address(cond)?,
            target: jump_target(target)?,
        },
        _ => {
            return Err(RuntimeError::UnsupportedOperation {
                token: head.to_string(),
                operands: operands.len(),
                pc: None,
            })
        }
    };

    Ok(instruction)
}

fn address<T: AsRef<str>>(token: &T) -> Result<Address, RuntimeError> {
    let token = token.as_ref();
    token
        .parse::<Address>()
        .map_err(|_| RuntimeError::InvalidOperand {
            token: token.to_string(),
            pc: None,
        })
}

fn jump_target<T: AsRef<str>>(token: &T) -> Result<usize, RuntimeError> {
    let token = token.as_ref();
    token
        .parse::<usize>()
        .map_err(|_| RuntimeError::InvalidOperand {
            token: token.to_string(),
            pc: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, RuntimeError> {
        Parser::new(source).parse_program()
    }

    #[test]
    fn test_decode_shapes() {
        let program = parse(
            "+ 200000 200001 50000\n= 50000 10000\nu- 10000 170000\nPARAM 10000\nprint\nprintln 10000\nGOTOF 90000 7\nGOTO 0\n",
        )
        .unwrap();

        assert_eq!(program.len(), 8);
        assert_eq!(
            program.instructions[0],
            Instruction::Binary {
                op: BinaryOp::Add,
                lhs: 200_000,
                rhs: 200_001,
                dst: 50_000
            }
        );
        assert_eq!(
            program.instructions[1],
            Instruction::Unary {
                op: UnaryOp::Assign,
                src: 50_000,
                dst: 10_000
            }
        );
        assert_eq!(
            program.instructions[2],
            Instruction::Unary {
                op: UnaryOp::Neg,
                src: 10_000,
                dst: 170_000
            }
        );
        assert_eq!(program.instructions[3], Instruction::Param { src: 10_000 });
        assert_eq!(
            program.instructions[4],
            Instruction::Print {
                src: None,
                newline: false
            }
        );
        assert_eq!(
            program.instructions[5],
            Instruction::Print {
                src: Some(10_000),
                newline: true
            }
        );
        assert_eq!(
            program.instructions[6],
            Instruction::GotoF {
                cond: 90_000,
                target: 7
            }
        );
        assert_eq!(program.instructions[7], Instruction::Goto { target: 0 });
    }

    #[test]
    fn test_plain_minus_with_two_operands_is_unary() {
        let program = parse("- 200000 50000").unwrap();
        assert_eq!(
            program.instructions[0],
            Instruction::Unary {
                op: UnaryOp::Neg,
                src: 200_000,
                dst: 50_000
            }
        );
    }

    #[test]
    fn test_blank_line_is_halt() {
        let program = parse("= 200000 10000\n\nprint 10000\n").unwrap();
        assert_eq!(program.len(), 3);
        assert_eq!(program.instructions[1], Instruction::Halt);
    }

    #[test]
    fn test_unknown_token() {
        let err = parse("= 200000 10000\nread 10000").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::UnsupportedOperation {
                token: "read".to_string(),
                operands: 1,
                pc: Some(1)
            }
        );
    }

    #[test]
    fn test_wrong_arity_is_unsupported() {
        let err = parse("GOTO 1 2").unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedOperation { .. }));
        let err = parse("not 1 2 3").unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_bad_operand() {
        let err = parse("PARAM x").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::InvalidOperand {
                token: "x".to_string(),
                pc: Some(0)
            }
        );
    }

    #[test]
    fn test_jump_target_bounds() {
        assert!(parse("GOTO 1").is_ok());
        let err = parse("GOTO 2").unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidJumpTarget {
                target: 2,
                program_len: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_from_quadruples() {
        let quads = vec![vec!["PARAM", "10000"], vec!["println"]];
        let program = Parser::from_quadruples(&quads).parse_program().unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(
            program.instructions[1],
            Instruction::Print {
                src: None,
                newline: true
            }
        );
    }
}
