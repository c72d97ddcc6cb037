//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents every value a memory
//! cell can hold. The front end decides which kind lives at which address; the
//! value itself is still tagged so that operators can reject nonsensical
//! combinations with a typed error instead of producing garbage.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 64-bit signed integer
//! - [`Value::Real`]: 64-bit float
//! - [`Value::Bool`]: boolean
//! - [`Value::Str`]: owned UTF-8 string
//!
//! # Text Form
//!
//! The [`fmt::Display`] impl is the text form used by `print`/`println`.
//! Reals always carry a fractional part (`2.0`, not `2`) and booleans render
//! as `True` / `False`.

use super::DataType;
use std::fmt;

/// Memory address type
pub type Address = u32;

/// Runtime values stored in memory cells
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// The data type this value naturally belongs to
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Real(_) => DataType::Real,
            Value::Bool(_) => DataType::Bool,
            Value::Str(_) => DataType::Str,
        }
    }

    /// Truthiness used by `GOTOF` and `not`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Real(x) => *x != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
        }
    }

    /// Numeric view of the value, promoting integers to reals
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Real(x) => Some(*x),
            _ => None,
        }
    }

    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Check whether this is the additive identity of its numeric type
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(n) => *n == 0,
            Value::Real(x) => *x == 0.0,
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Real(_))
    }

    /// Rough heap footprint, used for snapshot budgeting
    pub fn estimated_size(&self) -> usize {
        match self {
            Value::Str(s) => std::mem::size_of::<Value>() + s.len(),
            _ => std::mem::size_of::<Value>(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Real(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Real(2.0).to_string(), "2.0");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Real(0.0).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::Str("x".into()).is_truthy());
    }
}
