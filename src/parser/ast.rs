//! Decoded instruction set
//!
//! A quadruple arrives as a small list of tokens. Decoding turns it into an
//! [`Instruction`], so the execution loop matches exhaustively on a closed set
//! of variants instead of looking tokens up at runtime.

use crate::memory::value::Address;
use std::fmt;

/// Operators taking one source operand (`op src dst`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Assign,
    Plus,
    Neg,
    Not,
    Inc,
    Dec,
}

impl UnaryOp {
    /// Map a token to a unary operator.
    ///
    /// Plain `+`/`-` resolve here only when the quadruple has the unary shape.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(UnaryOp::Assign),
            "u+" | "+" => Some(UnaryOp::Plus),
            "u-" | "-" => Some(UnaryOp::Neg),
            "not" => Some(UnaryOp::Not),
            "++" => Some(UnaryOp::Inc),
            "--" => Some(UnaryOp::Dec),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Assign => "=",
            UnaryOp::Plus => "u+",
            UnaryOp::Neg => "u-",
            UnaryOp::Not => "not",
            UnaryOp::Inc => "++",
            UnaryOp::Dec => "--",
        }
    }
}

/// Operators taking two source operands (`op lhs rhs dst`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            "**" => Some(BinaryOp::Pow),
            "mod" => Some(BinaryOp::Mod),
            "equals" => Some(BinaryOp::Eq),
            ">" => Some(BinaryOp::Gt),
            "<" => Some(BinaryOp::Lt),
            ">=" => Some(BinaryOp::Ge),
            "<=" => Some(BinaryOp::Le),
            "and" => Some(BinaryOp::And),
            "or" => Some(BinaryOp::Or),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
            BinaryOp::Mod => "mod",
            BinaryOp::Eq => "equals",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::Ge => ">=",
            BinaryOp::Le => "<=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

/// VM built-ins, each with a fixed set of accepted operand counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    Param,
    Print,
    Println,
    Goto,
    GotoF,
}

impl Intrinsic {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "PARAM" => Some(Intrinsic::Param),
            "print" => Some(Intrinsic::Print),
            "println" => Some(Intrinsic::Println),
            "GOTO" => Some(Intrinsic::Goto),
            "GOTOF" => Some(Intrinsic::GotoF),
            _ => None,
        }
    }

    /// Operand counts this intrinsic is defined for
    pub fn arities(self) -> &'static [usize] {
        match self {
            Intrinsic::Param => &[1],
            Intrinsic::Print | Intrinsic::Println => &[1, 0],
            Intrinsic::Goto => &[1],
            Intrinsic::GotoF => &[2],
        }
    }
}

/// A decoded quadruple
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    /// `dst := op(value(src))`
    Unary {
        op: UnaryOp,
        src: Address,
        dst: Address,
    },

    /// `dst := op(value(lhs), value(rhs))`
    Binary {
        op: BinaryOp,
        lhs: Address,
        rhs: Address,
        dst: Address,
    },

    /// Push `value(src)` onto the parameter stack
    Param { src: Address },

    /// Append a value's text form to the output buffer.
    /// `src: None` pops the value from the parameter stack.
    Print { src: Option<Address>, newline: bool },

    /// Unconditional jump to an instruction index
    Goto { target: usize },

    /// Jump to `target` when `value(cond)` is falsy
    GotoF { cond: Address, target: usize },

    /// Empty line; stops the run
    Halt,
}

impl Instruction {
    /// Jump target, for control-transfer instructions
    pub fn jump_target(&self) -> Option<usize> {
        match self {
            Instruction::Goto { target } | Instruction::GotoF { target, .. } => Some(*target),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Unary { op, src, dst } => write!(f, "{} {} {}", op.symbol(), src, dst),
            Instruction::Binary { op, lhs, rhs, dst } => {
                write!(f, "{} {} {} {}", op.symbol(), lhs, rhs, dst)
            }
            Instruction::Param { src } => write!(f, "PARAM {}", src),
            Instruction::Print { src, newline } => {
                let name = if *newline { "println" } else { "print" };
                match src {
                    Some(src) => write!(f, "{} {}", name, src),
                    None => write!(f, "{}", name),
                }
            }
            Instruction::Goto { target } => write!(f, "GOTO {}", target),
            Instruction::GotoF { cond, target } => write!(f, "GOTOF {} {}", cond, target),
            Instruction::Halt => Ok(()),
        }
    }
}

/// A decoded program; the index of each instruction is its jump address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Program { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }
}
