//! Unary operator evaluation

use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::UnaryOp;

pub fn evaluate_unary_op(op: UnaryOp, operand: &Value) -> Result<Value, RuntimeError> {
    use UnaryOp::*;

    match op {
        Assign => Ok(operand.clone()),
        Plus => match operand {
            Value::Int(_) | Value::Real(_) => Ok(operand.clone()),
            _ => Err(type_mismatch(op, operand)),
        },
        Neg => match operand {
            Value::Int(n) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::IntegerOverflow {
                    operation: format!("-{}", n),
                    pc: None,
                }),
            Value::Real(x) => Ok(Value::Real(-x)),
            _ => Err(type_mismatch(op, operand)),
        },
        Not => Ok(Value::Bool(!operand.is_truthy())),
        Inc | Dec => evaluate_inc_dec_op(op, operand),
    }
}

fn evaluate_inc_dec_op(op: UnaryOp, operand: &Value) -> Result<Value, RuntimeError> {
    let delta: i64 = if op == UnaryOp::Inc { 1 } else { -1 };
    match operand {
        Value::Int(n) => n
            .checked_add(delta)
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::IntegerOverflow {
                operation: format!("{}{}", n, op.symbol()),
                pc: None,
            }),
        Value::Real(x) => Ok(Value::Real(x + delta as f64)),
        _ => Err(type_mismatch(op, operand)),
    }
}

fn type_mismatch(op: UnaryOp, operand: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        operation: op.symbol().to_string(),
        operands: vec![operand.clone()],
        pc: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(evaluate_unary_op(UnaryOp::Neg, &Value::Int(4)).unwrap(), Value::Int(-4));
        assert_eq!(
            evaluate_unary_op(UnaryOp::Neg, &Value::Real(1.5)).unwrap(),
            Value::Real(-1.5)
        );
        assert_eq!(evaluate_unary_op(UnaryOp::Plus, &Value::Int(4)).unwrap(), Value::Int(4));
        assert!(evaluate_unary_op(UnaryOp::Neg, &Value::Bool(true)).is_err());
        assert!(matches!(
            evaluate_unary_op(UnaryOp::Neg, &Value::Int(i64::MIN)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_increment_decrement() {
        assert_eq!(evaluate_unary_op(UnaryOp::Inc, &Value::Int(4)).unwrap(), Value::Int(5));
        assert_eq!(evaluate_unary_op(UnaryOp::Dec, &Value::Int(4)).unwrap(), Value::Int(3));
        assert_eq!(
            evaluate_unary_op(UnaryOp::Dec, &Value::Real(0.5)).unwrap(),
            Value::Real(-0.5)
        );
    }

    #[test]
    fn test_not_and_assign() {
        assert_eq!(
            evaluate_unary_op(UnaryOp::Not, &Value::Bool(false)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(evaluate_unary_op(UnaryOp::Not, &Value::Int(3)).unwrap(), Value::Bool(false));
        assert_eq!(
            evaluate_unary_op(UnaryOp::Assign, &Value::from("x")).unwrap(),
            Value::from("x")
        );
    }
}
