//! Operators on concrete values

use l1_rpn::Op;
use l1_types::{Literal, ValueType};

use crate::vm::error::RuntimeErrorKind;

fn number(op: Op, value: &Literal) -> Result<f64, RuntimeErrorKind> {
    value.as_number().ok_or(RuntimeErrorKind::TypeMismatch {
        op,
        expected: ValueType::Number,
        found: value.value_type(),
    })
}

/// Negates a number
pub fn negate(value: &Literal) -> Result<Literal, RuntimeErrorKind> {
    Ok(Literal::Number(-number(Op::Negate, value)?))
}

/// Applies a binary arithmetic or relational operator
pub fn binary(op: Op, left: &Literal, right: &Literal) -> Result<Literal, RuntimeErrorKind> {
    match op {
        Op::Eq => equal(op, left, right).map(Literal::Boolean),
        Op::Neq => equal(op, left, right).map(|equal| Literal::Boolean(!equal)),
        _ => {
            let a = number(op, left)?;
            let b = number(op, right)?;
            let result = match op {
                Op::Add => Literal::Number(a + b),
                Op::Subtract => Literal::Number(a - b),
                Op::Mult => Literal::Number(a * b),
                Op::Divide => Literal::Number(a / b),
                Op::Pow => Literal::Number(a.powf(b)),
                Op::Gt => Literal::Boolean(a > b),
                Op::Gte => Literal::Boolean(a >= b),
                Op::Lt => Literal::Boolean(a < b),
                Op::Lte => Literal::Boolean(a <= b),
                _ => unreachable!("{op} is not a binary operator on values"),
            };
            Ok(result)
        }
    }
}

/// Values of different types are never compared
fn equal(op: Op, left: &Literal, right: &Literal) -> Result<bool, RuntimeErrorKind> {
    if left.value_type() != right.value_type() {
        return Err(RuntimeErrorKind::TypeMismatch {
            op,
            expected: left.value_type(),
            found: right.value_type(),
        });
    }
    Ok(left == right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let three = Literal::Number(3.0);
        let four = Literal::Number(4.0);
        assert_eq!(binary(Op::Add, &three, &four), Ok(Literal::Number(7.0)));
        assert_eq!(binary(Op::Subtract, &three, &four), Ok(Literal::Number(-1.0)));
        assert_eq!(binary(Op::Pow, &three, &four), Ok(Literal::Number(81.0)));
        assert_eq!(binary(Op::Lte, &three, &four), Ok(Literal::Boolean(true)));
        assert_eq!(negate(&three), Ok(Literal::Number(-3.0)));
    }

    #[test]
    fn test_equality_needs_same_types() {
        let a = Literal::String("a".to_string());
        assert_eq!(
            binary(Op::Eq, &a, &Literal::String("a".to_string())),
            Ok(Literal::Boolean(true))
        );
        assert_eq!(
            binary(Op::Neq, &Literal::Boolean(true), &Literal::Boolean(false)),
            Ok(Literal::Boolean(true))
        );
        assert_eq!(
            binary(Op::Eq, &a, &Literal::Number(1.0)),
            Err(RuntimeErrorKind::TypeMismatch {
                op: Op::Eq,
                expected: ValueType::String,
                found: ValueType::Number,
            })
        );
    }

    #[test]
    fn test_arithmetic_needs_numbers() {
        assert_eq!(
            binary(Op::Add, &Literal::String("a".to_string()), &Literal::Number(1.0)),
            Err(RuntimeErrorKind::TypeMismatch {
                op: Op::Add,
                expected: ValueType::Number,
                found: ValueType::String,
            })
        );
        assert!(negate(&Literal::Boolean(true)).is_err());
    }
}
