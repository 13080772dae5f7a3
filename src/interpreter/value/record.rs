use std::{collections::HashMap, fmt};

use crate::interpreter::value::core::Value;

/// A record whose members a compiled expression reads.
///
/// Implementations answer member reads by name. The compiler has already
/// checked every name against the record's type, so returning `None` for a
/// declared member is reported as [`EvalError::MissingMember`](crate::error::EvalError::MissingMember).
pub trait Record: fmt::Debug + Send + Sync {
    /// The name of this record's type, as known to the type-introspection
    /// service.
    fn type_name(&self) -> &str;

    /// Reads a property.
    fn property(&self, name: &str) -> Option<Value>;

    /// Reads a field. Records without fields keep the default.
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// A record backed by hash maps.
///
/// Useful for tests, the command line tool, and callers whose data has no
/// fixed Rust shape.
///
/// ```
/// use sift::interpreter::value::{core::Value, record::{DynamicRecord, Record}};
///
/// let player = DynamicRecord::new("Player").with_property("age", 25_i64)
///                                          .with_field("level", 3_i64);
///
/// assert_eq!(player.property("age"), Some(Value::Integer(25)));
/// assert_eq!(player.field("level"), Some(Value::Integer(3)));
/// assert_eq!(player.property("level"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DynamicRecord {
    type_name:  String,
    properties: HashMap<String, Value>,
    fields:     HashMap<String, Value>,
}

impl DynamicRecord {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name:  type_name.into(),
               properties: HashMap::new(),
               fields:     HashMap::new(), }
    }

    /// Adds or replaces a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Adds or replaces a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }
}

impl Record for DynamicRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.properties.get(name).cloned()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }
}
