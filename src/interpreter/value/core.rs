use std::{cmp::Ordering, fmt, sync::Arc};

use ordered_float::OrderedFloat;

use crate::{
    error::{EvalError, EvalResult},
    interpreter::value::{record::Record, types::ValueType},
    util::num::exact_f64,
};

/// Represents a runtime value.
///
/// Values flow through evaluation and are stored inside compiled literals, so
/// every variant is cheap to clone and safe to share across threads.
#[derive(Clone)]
pub enum Value {
    /// The absence of a value.
    Null,
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A 64-bit integer value.
    Integer(i64),
    /// A totally ordered double precision value.
    Decimal(OrderedFloat<f64>),
    /// A text value.
    Text(Arc<str>),
    /// The name of an enumeration variant.
    Enum(Arc<str>),
    /// A nested record.
    Record(Arc<dyn Record>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Decimal(OrderedFloat(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(Arc::from(v))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl Value {
    /// Creates an enumeration variant value.
    #[must_use]
    pub fn variant(name: &str) -> Self {
        Self::Enum(Arc::from(name))
    }

    /// Wraps a record so it can be nested inside another record.
    #[must_use]
    pub fn record(record: impl Record + 'static) -> Self {
        Self::Record(Arc::new(record))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short description of the value's runtime kind, used in errors.
    #[must_use]
    pub fn kind(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Integer(_) => "integer".to_string(),
            Self::Decimal(_) => "decimal".to_string(),
            Self::Text(_) => "text".to_string(),
            Self::Enum(_) => "enum variant".to_string(),
            Self::Record(r) => r.type_name().to_string(),
        }
    }

    /// Checks whether this value can inhabit `ty`.
    ///
    /// Records and enums are matched by kind only; their names are a compile
    /// time concern.
    #[must_use]
    pub fn fits(&self, ty: &ValueType) -> bool {
        match (self, ty.non_null()) {
            (Self::Null, _) => ty.is_nullable(),
            (Self::Bool(_), ValueType::Bool)
            | (Self::Integer(_), ValueType::Integer | ValueType::Decimal)
            | (Self::Decimal(_), ValueType::Decimal)
            | (Self::Text(_), ValueType::Text)
            | (Self::Enum(_), ValueType::Enum(_))
            | (Self::Record(_), ValueType::Record(_)) => true,
            _ => false,
        }
    }

    /// Converts the value to `bool`, or returns an error if not boolean.
    ///
    /// ```
    /// use sift::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool().unwrap(), true);
    /// assert!(Value::Integer(1).as_bool().is_err());
    /// ```
    pub fn as_bool(&self) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }

    /// Converts the value to `i64`, or returns an error if not an integer.
    pub fn as_integer(&self) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            other => Err(mismatch("integer", other)),
        }
    }

    /// Converts the value to an `f64`, or returns an error if not numeric.
    ///
    /// Integers are promoted, but only when they are exactly representable.
    pub fn as_decimal(&self) -> EvalResult<f64> {
        match self {
            Self::Decimal(d) => Ok(d.0),
            Self::Integer(n) => exact_f64(*n).ok_or(EvalError::PrecisionLoss),
            other => Err(mismatch("decimal", other)),
        }
    }

    /// Borrows the text of a text or enumeration value.
    pub fn as_text(&self) -> EvalResult<&str> {
        match self {
            Self::Text(s) | Self::Enum(s) => Ok(s),
            other => Err(mismatch("text", other)),
        }
    }

    /// Structural equality with numeric promotion.
    ///
    /// `null` equals only `null`. Records are equal only when they are the
    /// same shared instance.
    pub fn loosely_equals(&self, other: &Self) -> EvalResult<bool> {
        Ok(match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::Integer(_), Self::Decimal(_)) | (Self::Decimal(_), Self::Integer(_)) => {
                OrderedFloat(self.as_decimal()?) == OrderedFloat(other.as_decimal()?)
            },
            _ => self == other,
        })
    }

    /// Total ordering between two non-null numeric or text values.
    ///
    /// Returns `None` when either side is null.
    pub fn compare(&self, other: &Self) -> EvalResult<Option<Ordering>> {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => Ok(None),
            (Self::Integer(a), Self::Integer(b)) => Ok(Some(a.cmp(b))),
            (Self::Integer(_) | Self::Decimal(_), Self::Integer(_) | Self::Decimal(_)) => {
                Ok(Some(OrderedFloat(self.as_decimal()?).cmp(&OrderedFloat(other.as_decimal()?))))
            },
            (Self::Text(a), Self::Text(b)) => Ok(Some(a.cmp(b))),
            (left, right) => Err(EvalError::TypeMismatch { expected: "two ordered values"
                                                                         .to_string(),
                                                           found:    format!("{} and {}",
                                                                             left.kind(),
                                                                             right.kind()), }),
        }
    }
}

fn mismatch(expected: &str, found: &Value) -> EvalError {
    if found.is_null() {
        EvalError::UnexpectedNull { context: format!("a {expected} operand") }
    } else {
        EvalError::TypeMismatch { expected: expected.to_string(),
                                  found:    found.kind(), }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Text(a), Self::Text(b)) | (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Integer(n) => write!(f, "Integer({n})"),
            Self::Decimal(d) => write!(f, "Decimal({})", d.0),
            Self::Text(s) => write!(f, "Text({s:?})"),
            Self::Enum(s) => write!(f, "Enum({s})"),
            Self::Record(r) => write!(f, "Record({r:?})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{}", d.0),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Enum(s) => write!(f, "{s}"),
            Self::Record(r) => write!(f, "<{}>", r.type_name()),
        }
    }
}
