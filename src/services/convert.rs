use std::collections::HashMap;

use thiserror::Error;

use crate::interpreter::value::{core::Value, types::ValueType};

/// Why a literal could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConversionFailure(pub String);

/// Converts literal text into a value of a known type.
///
/// The tree builder calls this once a pending literal meets a typed sibling.
/// Quotes have already been removed and the null literal never reaches the
/// converter.
pub trait ValueConverter {
    /// Converts `text` into a value of type `target`.
    fn convert(&self, text: &str, target: &ValueType) -> Result<Value, ConversionFailure>;
}

/// The default converter: scalars plus a table of enumeration vocabularies.
///
/// ```
/// use sift::{
///     interpreter::value::{core::Value, types::ValueType},
///     services::{StandardConverter, ValueConverter},
/// };
///
/// let converter = StandardConverter::new().with_enum("Class", ["Warrior", "Mage"]);
///
/// assert_eq!(converter.convert("25", &ValueType::Integer).unwrap(), Value::Integer(25));
/// assert_eq!(converter.convert("mage", &ValueType::Enum("Class".into())).unwrap(),
///            Value::variant("Mage"));
/// assert!(converter.convert("2.5", &ValueType::Integer).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StandardConverter {
    enums: HashMap<String, Vec<String>>,
}

impl StandardConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the variants of an enumeration type.
    #[must_use]
    pub fn with_enum<I, S>(mut self, name: impl Into<String>, variants: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.enums
            .insert(name.into(), variants.into_iter().map(Into::into).collect());
        self
    }
}

impl ValueConverter for StandardConverter {
    fn convert(&self, text: &str, target: &ValueType) -> Result<Value, ConversionFailure> {
        convert_standard(text, target, |name| self.enums.get(name).map(Vec::as_slice))
    }
}

/// Converts `text` to `target` using the standard scalar rules.
///
/// - `bool`: `true` or `false`, case-insensitive.
/// - `integer`: a base 10 `i64`.
/// - `decimal`: a finite `f64`.
/// - `text`: the text itself.
/// - enums: a variant name, case-insensitive, resolved through `variants`.
///
/// Records cannot be written as literals.
pub fn convert_standard<'v>(text: &str,
                            target: &ValueType,
                            variants: impl Fn(&str) -> Option<&'v [String]>)
                            -> Result<Value, ConversionFailure> {
    match target {
        ValueType::Nullable(inner) => convert_standard(text, inner, variants),
        ValueType::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(ConversionFailure("expected 'true' or 'false'".to_string()))
            }
        },
        ValueType::Integer => text.parse::<i64>()
                                  .map(Value::Integer)
                                  .map_err(|e| ConversionFailure(e.to_string())),
        ValueType::Decimal => match text.parse::<f64>() {
            Ok(d) if d.is_finite() => Ok(Value::from(d)),
            Ok(_) => Err(ConversionFailure("decimal literals must be finite".to_string())),
            Err(e) => Err(ConversionFailure(e.to_string())),
        },
        ValueType::Text => Ok(Value::from(text)),
        ValueType::Enum(name) => {
            let known = variants(name).ok_or_else(|| {
                                           ConversionFailure(format!("enumeration '{name}' has no known variants"))
                                       })?;
            known.iter()
                 .find(|v| v.eq_ignore_ascii_case(text))
                 .map(|v| Value::variant(v))
                 .ok_or_else(|| ConversionFailure(format!("'{name}' has no variant named '{text}'")))
        },
        ValueType::Record(name) => {
            Err(ConversionFailure(format!("record type '{name}' cannot be written as a literal")))
        },
    }
}
