use std::cmp::Ordering;

use crate::{
    ast::{BinaryOperator, ComparisonOperator},
    error::{EvalError, EvalResult},
    interpreter::value::core::Value,
};

/// Applies an arithmetic operator.
///
/// A null operand makes the result null. Two integers use checked integer
/// arithmetic; anything else is promoted to decimal.
///
/// ```
/// use sift::{
///     ast::BinaryOperator,
///     error::EvalError,
///     interpreter::{evaluator::binary::arithmetic, value::core::Value},
/// };
///
/// let seven = arithmetic(BinaryOperator::Div, &Value::Integer(15), &Value::Integer(2)).unwrap();
/// assert_eq!(seven, Value::Integer(7));
///
/// let half = arithmetic(BinaryOperator::Div, &Value::Integer(1), &Value::from(2.0)).unwrap();
/// assert_eq!(half, Value::from(0.5));
///
/// assert_eq!(arithmetic(BinaryOperator::Add, &Value::Integer(i64::MAX), &Value::Integer(1)),
///            Err(EvalError::Overflow));
/// ```
pub fn arithmetic(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer(op, *a, *b),
        _ => decimal(op, left.as_decimal()?, right.as_decimal()?),
    }
}

fn integer(op: BinaryOperator, a: i64, b: i64) -> EvalResult<Value> {
    let result = match op {
        BinaryOperator::Add => a.checked_add(b),
        BinaryOperator::Sub => a.checked_sub(b),
        BinaryOperator::Mul => a.checked_mul(b),
        BinaryOperator::Div if b == 0 => return Err(EvalError::DivisionByZero),
        BinaryOperator::Div => a.checked_div(b),
        logical => return Err(not_arithmetic(logical)),
    };
    result.map(Value::Integer).ok_or(EvalError::Overflow)
}

fn decimal(op: BinaryOperator, a: f64, b: f64) -> EvalResult<Value> {
    let result = match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div if b == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOperator::Div => a / b,
        logical => return Err(not_arithmetic(logical)),
    };
    if result.is_finite() {
        Ok(Value::from(result))
    } else {
        Err(EvalError::Overflow)
    }
}

fn not_arithmetic(op: BinaryOperator) -> EvalError {
    EvalError::TypeMismatch { expected: "an arithmetic operator".to_string(),
                              found:    format!("'{op}'"), }
}

/// Applies a comparison operator.
///
/// `==` and `!=` treat null as a value equal only to itself. Orderings
/// involving null are false.
///
/// ```
/// use sift::{
///     ast::ComparisonOperator,
///     interpreter::{evaluator::binary::compare, value::core::Value},
/// };
///
/// assert!(compare(ComparisonOperator::Equal, &Value::Null, &Value::Null).unwrap());
/// assert!(!compare(ComparisonOperator::Less, &Value::Null, &Value::Integer(1)).unwrap());
/// assert!(compare(ComparisonOperator::GreaterEqual, &Value::from(2.5), &Value::Integer(2)).unwrap());
/// ```
pub fn compare(op: ComparisonOperator, left: &Value, right: &Value) -> EvalResult<bool> {
    let ordering = match op {
        ComparisonOperator::Equal => return left.loosely_equals(right),
        ComparisonOperator::NotEqual => return left.loosely_equals(right).map(|eq| !eq),
        _ => left.compare(right)?,
    };
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    Ok(match op {
        ComparisonOperator::Less => ordering == Ordering::Less,
        ComparisonOperator::LessEqual => ordering != Ordering::Greater,
        ComparisonOperator::Greater => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    })
}
