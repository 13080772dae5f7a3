use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The static type of a value, as seen by the compiler.
///
/// Record and enum types are identified by name; their members and variants
/// are known only to the injected services. `Nullable` never nests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueType {
    /// `true` or `false`.
    Bool,
    /// 64-bit signed integer.
    Integer,
    /// Double precision decimal number.
    Decimal,
    /// UTF-8 text.
    Text,
    /// A named enumeration whose variants are plain identifiers.
    Enum(String),
    /// A named record type with members.
    Record(String),
    /// The wrapped type, or null.
    Nullable(Box<Self>),
}

impl ValueType {
    /// Returns the nullable counterpart of `self`.
    ///
    /// Already nullable types are returned unchanged.
    ///
    /// ```
    /// use sift::interpreter::value::types::ValueType;
    ///
    /// let once = ValueType::Integer.nullable();
    /// assert_eq!(once.clone().nullable(), once);
    /// ```
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            Self::Nullable(_) => self,
            other => Self::Nullable(Box::new(other)),
        }
    }

    /// Strips a `Nullable` wrapper, if any.
    #[must_use]
    pub fn non_null(&self) -> &Self {
        match self {
            Self::Nullable(inner) => inner,
            other => other,
        }
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Whether the underlying type is `integer` or `decimal`.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self.non_null(), Self::Integer | Self::Decimal)
    }

    /// Whether the underlying type is a record.
    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self.non_null(), Self::Record(_))
    }

    /// Whether a value of type `self` may be used where `target` is expected.
    ///
    /// Nullability is ignored, and integers widen to decimals.
    #[must_use]
    pub fn is_assignable_to(&self, target: &Self) -> bool {
        let (from, to) = (self.non_null(), target.non_null());
        from == to || (*from == Self::Integer && *to == Self::Decimal)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "integer"),
            Self::Decimal => write!(f, "decimal"),
            Self::Text => write!(f, "text"),
            Self::Enum(name) | Self::Record(name) => write!(f, "{name}"),
            Self::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

/// Error returned when a type name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid type name")]
pub struct InvalidTypeName(pub String);

impl FromStr for ValueType {
    type Err = InvalidTypeName;

    /// Parses `bool`, `integer`, `decimal`, `text`, a record name, or any of
    /// these followed by `?`.
    ///
    /// Bare names parse as records; [`Schema`](crate::services::Schema)
    /// reinterprets the ones it declares as enums.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix('?') {
            let inner: Self = inner.parse()?;
            if inner.is_nullable() {
                return Err(InvalidTypeName(s.to_string()));
            }
            return Ok(inner.nullable());
        }
        match s {
            "bool" => Ok(Self::Bool),
            "integer" => Ok(Self::Integer),
            "decimal" => Ok(Self::Decimal),
            "text" => Ok(Self::Text),
            name if is_identifier(name) => Ok(Self::Record(name.to_string())),
            _ => Err(InvalidTypeName(s.to_string())),
        }
    }
}

impl TryFrom<String> for ValueType {
    type Error = InvalidTypeName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.to_string()
    }
}

/// Tests whether `s` is a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`).
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next()
         .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
