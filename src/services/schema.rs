use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    compiler::CompilerOptions,
    interpreter::value::{
        core::Value,
        record::DynamicRecord,
        types::{ValueType, is_identifier},
    },
    services::convert::{ConversionFailure, ValueConverter, convert_standard},
};

/// Answers "what type does this member have?" for record types.
///
/// This is the compiler's only source of knowledge about record shapes. The
/// `owner` passed in is always a non-null record type. When both a property
/// and a field share a name, the property wins.
pub trait TypeIntrospection {
    /// The declared type of property `name` on `owner`, if it exists.
    fn property_type(&self, owner: &ValueType, name: &str) -> Option<ValueType>;

    /// The declared type of field `name` on `owner`, if it exists.
    fn field_type(&self, _owner: &ValueType, _name: &str) -> Option<ValueType> {
        None
    }
}

/// Errors raised while loading a schema or mapping JSON onto it.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema or record document is not valid JSON for its shape.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A member refers to a type the schema does not declare.
    #[error("Member '{owner}.{member}' has unknown type '{type_name}'.")]
    UnknownType {
        /// The declaring record.
        owner:     String,
        /// The member.
        member:    String,
        /// The undeclared type name.
        type_name: String,
    },
    /// A record or enum name is not a plain identifier.
    #[error("'{0}' is not a valid type name.")]
    InvalidName(String),
    /// The root type is missing or is not a declared record.
    #[error("Root type '{0}' is not a declared record.")]
    UnknownRoot(String),
    /// A JSON value does not match the declared member type.
    #[error("Value at '{path}' does not match type {expected}: {details}.")]
    Mismatch {
        /// Dotted path to the offending value.
        path:     String,
        /// The declared type.
        expected: String,
        /// Details about the mismatch.
        details:  String,
    },
}

/// The declared members of one record type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, ValueType>,
    #[serde(default)]
    pub fields:     BTreeMap<String, ValueType>,
}

impl RecordSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn property(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.properties.insert(name.into(), ty);
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }
}

/// A declarative type-introspection and value-conversion service.
///
/// A schema lists record types with their properties and fields, and the
/// variants of enumeration types. Member types are written as in
/// [`ValueType`]'s textual form; bare names that match a declared enum are
/// enum types, the rest are record types.
///
/// ```
/// use sift::services::Schema;
///
/// let schema = Schema::from_json(r#"{
///     "root": "Player",
///     "records": {
///         "Player": { "properties": { "age": "integer", "guild": "Guild?", "class": "Class" } },
///         "Guild":  { "fields": { "name": "text" } }
///     },
///     "enums": { "Class": ["Warrior", "Mage"] }
/// }"#).unwrap();
///
/// assert_eq!(schema.root_type().unwrap().to_string(), "Player");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// The record type expressions are compiled against.
    #[serde(default)]
    pub root:    Option<String>,
    #[serde(default)]
    pub records: BTreeMap<String, RecordSchema>,
    #[serde(default)]
    pub enums:   BTreeMap<String, Vec<String>>,
    /// Compiler options shipped alongside the schema.
    #[serde(default)]
    pub options: CompilerOptions,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a schema document.
    pub fn from_json(source: &str) -> Result<Self, SchemaError> {
        let mut schema: Self = serde_json::from_str(source)?;
        schema.resolve_enums();
        schema.validate()?;
        Ok(schema)
    }

    /// Sets the root record type.
    #[must_use]
    pub fn with_root(mut self, name: impl Into<String>) -> Self {
        self.root = Some(name.into());
        self
    }

    /// Declares a record type.
    #[must_use]
    pub fn with_record(mut self, name: impl Into<String>, record: RecordSchema) -> Self {
        self.records.insert(name.into(), record);
        self.resolve_enums();
        self
    }

    /// Declares an enumeration type.
    #[must_use]
    pub fn with_enum<I, S>(mut self, name: impl Into<String>, variants: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.enums
            .insert(name.into(), variants.into_iter().map(Into::into).collect());
        self.resolve_enums();
        self
    }

    /// The root record type, if one is declared.
    pub fn root_type(&self) -> Result<ValueType, SchemaError> {
        match &self.root {
            Some(name) if self.records.contains_key(name) => Ok(ValueType::Record(name.clone())),
            Some(name) => Err(SchemaError::UnknownRoot(name.clone())),
            None => Err(SchemaError::UnknownRoot(String::new())),
        }
    }

    /// Checks that every referenced type is declared.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for name in self.records.keys().chain(self.enums.keys()) {
            if !is_identifier(name) {
                return Err(SchemaError::InvalidName(name.clone()));
            }
        }
        for (owner, record) in &self.records {
            for (member, ty) in record.properties.iter().chain(&record.fields) {
                if let ValueType::Record(name) = ty.non_null()
                   && !self.records.contains_key(name)
                {
                    return Err(SchemaError::UnknownType { owner:     owner.clone(),
                                                          member:    member.clone(),
                                                          type_name: name.clone(), });
                }
            }
        }
        if self.root.is_some() {
            self.root_type()?;
        }
        Ok(())
    }

    /// Builds a record of type `type_name` from a JSON object.
    ///
    /// Properties and fields are both read from the object's keys. Missing
    /// keys and JSON `null` become [`Value::Null`], which only nullable members
    /// accept.
    pub fn record_from_json(&self,
                            type_name: &str,
                            json: &serde_json::Value)
                            -> Result<DynamicRecord, SchemaError> {
        self.record_at(type_name, json, type_name)
    }

    fn record_at(&self,
                 type_name: &str,
                 json: &serde_json::Value,
                 path: &str)
                 -> Result<DynamicRecord, SchemaError> {
        let declared =
            self.records
                .get(type_name)
                .ok_or_else(|| SchemaError::UnknownRoot(type_name.to_string()))?;
        let object = json.as_object()
                         .ok_or_else(|| SchemaError::Mismatch { path:     path.to_string(),
                                                                expected: type_name.to_string(),
                                                                details:  "expected an object"
                                                                              .to_string(), })?;

        let mut record = DynamicRecord::new(type_name);
        for (name, ty) in &declared.properties {
            let member_path = format!("{path}.{name}");
            let value = self.value_from_json(ty,
                                             object.get(name).unwrap_or(&serde_json::Value::Null),
                                             &member_path)?;
            record.set_property(name.clone(), value);
        }
        for (name, ty) in &declared.fields {
            let member_path = format!("{path}.{name}");
            let value = self.value_from_json(ty,
                                             object.get(name).unwrap_or(&serde_json::Value::Null),
                                             &member_path)?;
            record = record.with_field(name.clone(), value);
        }
        Ok(record)
    }

    fn value_from_json(&self,
                       ty: &ValueType,
                       json: &serde_json::Value,
                       path: &str)
                       -> Result<Value, SchemaError> {
        use serde_json::Value as Json;

        let mismatch = |details: &str| SchemaError::Mismatch { path:     path.to_string(),
                                                               expected: ty.to_string(),
                                                               details:  details.to_string(), };

        match (ty.non_null(), json) {
            (_, Json::Null) if ty.is_nullable() => Ok(Value::Null),
            (_, Json::Null) => Err(mismatch("member is not nullable")),
            (ValueType::Bool, Json::Bool(b)) => Ok(Value::Bool(*b)),
            (ValueType::Integer, Json::Number(n)) => {
                n.as_i64().map(Value::Integer).ok_or_else(|| mismatch("expected an integer"))
            },
            (ValueType::Decimal, Json::Number(n)) => {
                n.as_f64().map(Value::from).ok_or_else(|| mismatch("expected a decimal"))
            },
            (ValueType::Text, Json::String(s)) => Ok(Value::from(s.as_str())),
            (ValueType::Enum(_), Json::String(s)) => {
                self.convert(s, ty).map_err(|ConversionFailure(details)| mismatch(&details))
            },
            (ValueType::Record(name), Json::Object(_)) => {
                Ok(Value::record(self.record_at(name, json, path)?))
            },
            _ => Err(mismatch("unexpected JSON value")),
        }
    }

    /// Reinterprets bare type names that match a declared enum.
    fn resolve_enums(&mut self) {
        let enums = &self.enums;
        let resolve = |ty: &mut ValueType| {
            let target = match ty {
                ValueType::Nullable(inner) => inner.as_mut(),
                other => other,
            };
            if let ValueType::Record(name) = &mut *target
               && enums.contains_key(name.as_str())
            {
                *target = ValueType::Enum(std::mem::take(name));
            }
        };
        for record in self.records.values_mut() {
            record.properties.values_mut().for_each(resolve);
            record.fields.values_mut().for_each(resolve);
        }
    }

    fn lookup(&self, owner: &ValueType, name: &str, fields: bool) -> Option<ValueType> {
        let ValueType::Record(owner) = owner.non_null() else {
            return None;
        };
        let record = self.records.get(owner)?;
        let members = if fields { &record.fields } else { &record.properties };
        members.get(name).cloned()
    }
}

impl TypeIntrospection for Schema {
    fn property_type(&self, owner: &ValueType, name: &str) -> Option<ValueType> {
        self.lookup(owner, name, false)
    }

    fn field_type(&self, owner: &ValueType, name: &str) -> Option<ValueType> {
        self.lookup(owner, name, true)
    }
}

impl ValueConverter for Schema {
    fn convert(&self, text: &str, target: &ValueType) -> Result<Value, ConversionFailure> {
        convert_standard(text, target, |name| self.enums.get(name).map(Vec::as_slice))
    }
}
