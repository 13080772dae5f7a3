use std::sync::Arc;

use crate::{
    ast::{BinaryOperator, Expr, MemberKind, UnaryOperator},
    error::{EvalError, EvalResult},
    interpreter::{
        evaluator::binary::{arithmetic, compare},
        value::{core::Value, record::Record},
    },
};

/// The state of one evaluation: the input record.
///
/// An evaluation borrows everything it reads, so any number of them may run
/// concurrently over the same compiled tree.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'r> {
    input: &'r dyn Record,
}

/// A record reached while walking member chains.
enum RecordRef<'r> {
    /// The input record itself.
    Input(&'r dyn Record),
    /// A nested record read from a member.
    Owned(Arc<dyn Record>),
    Null,
}

impl<'r> Evaluation<'r> {
    #[must_use]
    pub fn new(input: &'r dyn Record) -> Self {
        Self { input }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// The evaluator dispatches on the expression variant. `&&` and `||`
    /// skip their right operand when the left one decides the result; every
    /// other operator evaluates its operands left to right.
    pub fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Input => Err(EvalError::TypeMismatch { expected: "a scalar value".to_string(),
                                                         found:    self.input
                                                                       .type_name()
                                                                       .to_string(), }),
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Member { parent, name, kind, .. } => match self.eval_record(parent)? {
                RecordRef::Null => Err(EvalError::NullReference { member: name.clone() }),
                record => read_member(&record, name, *kind),
            },
            Expr::ConditionalMember { parent, name, kind, .. } => {
                match self.eval_record(parent)? {
                    RecordRef::Null => Ok(Value::Null),
                    record => read_member(&record, name, *kind),
                }
            },
            Expr::Unary { op: UnaryOperator::Not,
                          operand, } => Ok(Value::Bool(!self.eval(operand)?.as_bool()?)),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Comparison { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                compare(*op, &left, &right).map(Value::Bool)
            },
            Expr::Call { function, arguments } => {
                let arguments = arguments.iter()
                                         .map(|argument| self.eval(argument))
                                         .collect::<EvalResult<Vec<_>>>()?;
                let result = function.call(&arguments)?;
                if result.fits(function.returns()) {
                    Ok(result)
                } else {
                    Err(EvalError::TypeMismatch { expected: function.returns().to_string(),
                                                  found:    result.kind(), })
                }
            },
        }
    }

    fn eval_binary(&self, op: BinaryOperator, left: &Expr, right: &Expr) -> EvalResult<Value> {
        match op {
            BinaryOperator::AndAlso => {
                Ok(Value::Bool(self.eval(left)?.as_bool()? && self.eval(right)?.as_bool()?))
            },
            BinaryOperator::OrElse => {
                Ok(Value::Bool(self.eval(left)?.as_bool()? || self.eval(right)?.as_bool()?))
            },
            BinaryOperator::And | BinaryOperator::Or => {
                let left = self.eval(left)?.as_bool()?;
                let right = self.eval(right)?.as_bool()?;
                Ok(Value::Bool(if op == BinaryOperator::And {
                                   left & right
                               } else {
                                   left | right
                               }))
            },
            arithmetic_op => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                arithmetic(arithmetic_op, &left, &right)
            },
        }
    }

    /// Evaluates an expression that must produce a record or null.
    fn eval_record(&self, expr: &Expr) -> EvalResult<RecordRef<'r>> {
        if matches!(expr, Expr::Input) {
            return Ok(RecordRef::Input(self.input));
        }
        match self.eval(expr)? {
            Value::Record(record) => Ok(RecordRef::Owned(record)),
            Value::Null => Ok(RecordRef::Null),
            other => Err(EvalError::TypeMismatch { expected: "a record".to_string(),
                                                   found:    other.kind(), }),
        }
    }
}

fn read_member(record: &RecordRef<'_>, name: &str, kind: MemberKind) -> EvalResult<Value> {
    let record: &dyn Record = match record {
        RecordRef::Input(record) => *record,
        RecordRef::Owned(record) => record.as_ref(),
        RecordRef::Null => return Ok(Value::Null),
    };
    let value = match kind {
        MemberKind::Property => record.property(name),
        MemberKind::Field => record.field(name),
    };
    value.ok_or_else(|| EvalError::MissingMember { type_name: record.type_name().to_string(),
                                                   member:    name.to_string(), })
}
