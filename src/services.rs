/// The value-conversion service.
///
/// Declares `ValueConverter`, which materializes literal text once the tree
/// builder knows the type it must have, and the standard conversions used by
/// the bundled implementations.
pub mod convert;
/// The type-introspection service.
///
/// Declares `TypeIntrospection`, the compiler's only window onto record
/// shapes, and `Schema`, a declarative implementation that can be loaded from
/// JSON and can turn JSON documents into records.
pub mod schema;

pub use convert::{ConversionFailure, StandardConverter, ValueConverter};
pub use schema::{RecordSchema, Schema, SchemaError, TypeIntrospection};
