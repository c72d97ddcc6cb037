//! Binary operator evaluation
//!
//! Every operator is a pure function of its two operand values. Integer
//! arithmetic is checked; `/` is true division and always yields a real.

use crate::interpreter::constants::MAX_STRING_LEN;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::BinaryOp;
use std::cmp::Ordering;

/// Operand pair after numeric promotion
enum Numeric {
    Ints(i64, i64),
    Reals(f64, f64),
}

fn numeric_pair(left: &Value, right: &Value) -> Option<Numeric> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(Numeric::Ints(*a, *b)),
        _ => Some(Numeric::Reals(left.as_real()?, right.as_real()?)),
    }
}

fn type_mismatch(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        operation: op.symbol().to_string(),
        operands: vec![left.clone(), right.clone()],
        pc: None,
    }
}

fn overflow(op: BinaryOp, a: i64, b: i64) -> RuntimeError {
    RuntimeError::IntegerOverflow {
        operation: format!("{} {} {}", a, op.symbol(), b),
        pc: None,
    }
}

pub fn evaluate_binary_op(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    use BinaryOp::*;

    match op {
        Add => checked_add_values(left, right),
        Sub => checked_sub_values(left, right),
        Mul => checked_mul_values(left, right),
        Div => checked_div_values(left, right),
        Pow => checked_pow_values(left, right),
        Mod => checked_mod_values(left, right),
        Eq => Ok(Value::Bool(values_equal(left, right))),
        Gt => compare_values(op, left, right, |o| o == Ordering::Greater),
        Lt => compare_values(op, left, right, |o| o == Ordering::Less),
        Ge => compare_values(op, left, right, |o| o != Ordering::Less),
        Le => compare_values(op, left, right, |o| o != Ordering::Greater),
        And | Or => logical_op(op, left, right),
    }
}

fn checked_add_values(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let (Value::Str(a), Value::Str(b)) = (left, right) {
        return Ok(Value::Str(format!("{}{}", a, b)));
    }

    match numeric_pair(left, right) {
        Some(Numeric::Ints(a, b)) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or_else(|| overflow(BinaryOp::Add, a, b)),
        Some(Numeric::Reals(a, b)) => Ok(Value::Real(a + b)),
        None => Err(type_mismatch(BinaryOp::Add, left, right)),
    }
}

fn checked_sub_values(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right) {
        Some(Numeric::Ints(a, b)) => a
            .checked_sub(b)
            .map(Value::Int)
            .ok_or_else(|| overflow(BinaryOp::Sub, a, b)),
        Some(Numeric::Reals(a, b)) => Ok(Value::Real(a - b)),
        None => Err(type_mismatch(BinaryOp::Sub, left, right)),
    }
}

fn checked_mul_values(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    // String repetition; negative counts give the empty string
    match (left, right) {
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
            return repeat_string(s, *n);
        }
        _ => {}
    }

    match numeric_pair(left, right) {
        Some(Numeric::Ints(a, b)) => a
            .checked_mul(b)
            .map(Value::Int)
            .ok_or_else(|| overflow(BinaryOp::Mul, a, b)),
        Some(Numeric::Reals(a, b)) => Ok(Value::Real(a * b)),
        None => Err(type_mismatch(BinaryOp::Mul, left, right)),
    }
}

fn repeat_string(s: &str, count: i64) -> Result<Value, RuntimeError> {
    let count = usize::try_from(count.max(0)).unwrap_or(usize::MAX);
    if s.is_empty() || count == 0 {
        return Ok(Value::Str(String::new()));
    }
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_STRING_LEN => Ok(Value::Str(s.repeat(count))),
        _ => Err(RuntimeError::IntegerOverflow {
            operation: format!("{:?} * {}", s, count),
            pc: None,
        }),
    }
}

fn checked_div_values(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let (Some(a), Some(b)) = (left.as_real(), right.as_real()) else {
        return Err(type_mismatch(BinaryOp::Div, left, right));
    };

    if right.is_zero() {
        return Err(RuntimeError::DivisionByZero {
            operation: BinaryOp::Div.symbol().to_string(),
            dividend: left.clone(),
            pc: None,
        });
    }

    Ok(Value::Real(a / b))
}

/// Floored modulo: the result takes the sign of the divisor
fn checked_mod_values(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let Some(pair) = numeric_pair(left, right) else {
        return Err(type_mismatch(BinaryOp::Mod, left, right));
    };

    if right.is_zero() {
        return Err(RuntimeError::DivisionByZero {
            operation: BinaryOp::Mod.symbol().to_string(),
            dividend: left.clone(),
            pc: None,
        });
    }

    match pair {
        Numeric::Ints(a, b) => {
            let r = a.checked_rem(b).ok_or_else(|| overflow(BinaryOp::Mod, a, b))?;
            if r != 0 && (r < 0) != (b < 0) {
                Ok(Value::Int(r + b))
            } else {
                Ok(Value::Int(r))
            }
        }
        Numeric::Reals(a, b) => {
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                Ok(Value::Real(r + b))
            } else {
                Ok(Value::Real(r))
            }
        }
    }
}

fn checked_pow_values(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match numeric_pair(left, right) {
        Some(Numeric::Ints(a, b)) if b >= 0 => checked_ipow(a, b)
            .map(Value::Int)
            .ok_or_else(|| overflow(BinaryOp::Pow, a, b)),
        Some(Numeric::Ints(a, b)) => Ok(Value::Real((a as f64).powf(b as f64))),
        Some(Numeric::Reals(a, b)) => Ok(Value::Real(a.powf(b))),
        None => Err(type_mismatch(BinaryOp::Pow, left, right)),
    }
}

/// Square-and-multiply over the full `i64` exponent range.
/// `None` only when the result itself overflows.
fn checked_ipow(base: i64, exp: i64) -> Option<i64> {
    let mut result: i64 = 1;
    let mut base = base;
    let mut exp = exp;
    loop {
        if exp & 1 == 1 {
            result = result.checked_mul(base)?;
        }
        exp >>= 1;
        if exp == 0 {
            return Some(result);
        }
        base = base.checked_mul(base)?;
    }
}

/// Equality with numeric promotion; unrelated kinds are simply unequal
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match numeric_pair(left, right) {
        Some(Numeric::Ints(a, b)) => a == b,
        Some(Numeric::Reals(a, b)) => a == b,
        None => left == right,
    }
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => match numeric_pair(left, right)? {
            Numeric::Ints(a, b) => Some(a.cmp(&b)),
            Numeric::Reals(a, b) => a.partial_cmp(&b),
        },
    }
}

fn compare_values<F>(op: BinaryOp, left: &Value, right: &Value, test: F) -> Result<Value, RuntimeError>
where
    F: Fn(Ordering) -> bool,
{
    let comparable = matches!(
        (left, right),
        (Value::Str(_), Value::Str(_)) | (Value::Bool(_), Value::Bool(_))
    ) || (left.is_numeric() && right.is_numeric());

    if !comparable {
        return Err(type_mismatch(op, left, right));
    }

    // NaN compares false against everything
    Ok(Value::Bool(ordering(left, right).is_some_and(test)))
}

fn logical_op(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match op {
            BinaryOp::And => *a && *b,
            _ => *a || *b,
        })),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(match op {
            BinaryOp::And => a & b,
            _ => a | b,
        })),
        _ => Err(type_mismatch(op, left, right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
        evaluate_binary_op(op, &left, &right)
    }

    #[test]
    fn test_arithmetic_promotion() {
        assert_eq!(eval(BinaryOp::Add, Value::Int(2), Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(
            eval(BinaryOp::Add, Value::Int(2), Value::Real(0.5)).unwrap(),
            Value::Real(2.5)
        );
        assert_eq!(eval(BinaryOp::Sub, Value::Int(2), Value::Int(5)).unwrap(), Value::Int(-3));
        assert_eq!(eval(BinaryOp::Mul, Value::Real(1.5), Value::Int(2)).unwrap(), Value::Real(3.0));
    }

    #[test]
    fn test_true_division() {
        assert_eq!(eval(BinaryOp::Div, Value::Int(7), Value::Int(2)).unwrap(), Value::Real(3.5));
        assert_eq!(eval(BinaryOp::Div, Value::Int(6), Value::Int(3)).unwrap(), Value::Real(2.0));
        assert_eq!(
            eval(BinaryOp::Div, Value::Real(1.0), Value::Real(4.0)).unwrap(),
            Value::Real(0.25)
        );
    }

    #[test]
    fn test_division_by_zero_reports_dividend() {
        for dividend in [Value::Int(0), Value::Int(-9), Value::Real(3.5)] {
            for divisor in [Value::Int(0), Value::Real(0.0)] {
                for op in [BinaryOp::Div, BinaryOp::Mod] {
                    match eval(op, dividend.clone(), divisor.clone()) {
                        Err(RuntimeError::DivisionByZero { dividend: d, .. }) => {
                            assert_eq!(d, dividend)
                        }
                        other => panic!("expected division by zero, got {:?}", other),
                    }
                }
            }
        }
    }

    #[test]
    fn test_floored_mod() {
        assert_eq!(eval(BinaryOp::Mod, Value::Int(7), Value::Int(3)).unwrap(), Value::Int(1));
        assert_eq!(eval(BinaryOp::Mod, Value::Int(-7), Value::Int(3)).unwrap(), Value::Int(2));
        assert_eq!(eval(BinaryOp::Mod, Value::Int(7), Value::Int(-3)).unwrap(), Value::Int(-2));
        assert_eq!(
            eval(BinaryOp::Mod, Value::Real(-1.5), Value::Real(1.0)).unwrap(),
            Value::Real(0.5)
        );
    }

    #[test]
    fn test_power() {
        assert_eq!(eval(BinaryOp::Pow, Value::Int(2), Value::Int(10)).unwrap(), Value::Int(1024));
        assert_eq!(eval(BinaryOp::Pow, Value::Int(2), Value::Int(-1)).unwrap(), Value::Real(0.5));
        assert!(matches!(
            eval(BinaryOp::Pow, Value::Int(10), Value::Int(40)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_power_with_huge_exponent() {
        let big = Value::Int(5_000_000_000);
        assert_eq!(eval(BinaryOp::Pow, Value::Int(1), big.clone()).unwrap(), Value::Int(1));
        assert_eq!(eval(BinaryOp::Pow, Value::Int(0), big.clone()).unwrap(), Value::Int(0));
        assert_eq!(eval(BinaryOp::Pow, Value::Int(-1), big.clone()).unwrap(), Value::Int(1));
        assert_eq!(
            eval(BinaryOp::Pow, Value::Int(-1), Value::Int(5_000_000_001)).unwrap(),
            Value::Int(-1)
        );
        assert_eq!(eval(BinaryOp::Pow, Value::Int(7), Value::Int(0)).unwrap(), Value::Int(1));
        assert_eq!(
            eval(BinaryOp::Pow, Value::Int(-2), Value::Int(63)).unwrap(),
            Value::Int(i64::MIN)
        );
        assert!(matches!(
            eval(BinaryOp::Pow, Value::Int(2), big),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_overflow_is_checked() {
        assert!(matches!(
            eval(BinaryOp::Add, Value::Int(i64::MAX), Value::Int(1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            eval(BinaryOp::Add, Value::from("do"), Value::from("re")).unwrap(),
            Value::from("dore")
        );
        assert_eq!(
            eval(BinaryOp::Mul, Value::from("la"), Value::Int(3)).unwrap(),
            Value::from("lalala")
        );
        assert!(matches!(
            eval(BinaryOp::Sub, Value::from("a"), Value::Int(1)),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_string_repeat_is_bounded() {
        assert!(matches!(
            eval(BinaryOp::Mul, Value::from("ab"), Value::Int(i64::MAX)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            eval(BinaryOp::Mul, Value::Int(i64::MAX / 2), Value::from("x")),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert_eq!(
            eval(BinaryOp::Mul, Value::from("ab"), Value::Int(-4)).unwrap(),
            Value::from("")
        );
        assert_eq!(
            eval(BinaryOp::Mul, Value::from(""), Value::Int(i64::MAX)).unwrap(),
            Value::from("")
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval(BinaryOp::Gt, Value::Int(3), Value::Real(2.5)).unwrap(), Value::Bool(true));
        assert_eq!(eval(BinaryOp::Le, Value::Int(3), Value::Int(3)).unwrap(), Value::Bool(true));
        assert_eq!(eval(BinaryOp::Lt, Value::from("a"), Value::from("b")).unwrap(), Value::Bool(true));
        assert_eq!(eval(BinaryOp::Eq, Value::Int(2), Value::Real(2.0)).unwrap(), Value::Bool(true));
        assert_eq!(eval(BinaryOp::Eq, Value::Int(1), Value::from("1")).unwrap(), Value::Bool(false));
        assert!(matches!(
            eval(BinaryOp::Ge, Value::Int(1), Value::from("1")),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_logical() {
        assert_eq!(
            eval(BinaryOp::And, Value::Bool(true), Value::Bool(false)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            eval(BinaryOp::Or, Value::Bool(false), Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(eval(BinaryOp::And, Value::Int(6), Value::Int(3)).unwrap(), Value::Int(2));
        assert!(eval(BinaryOp::Or, Value::Bool(true), Value::Int(1)).is_err());
    }
}
