/// Runtime values.
///
/// Defines the `Value` enum carried through evaluation and stored in compiled
/// literals, together with the conversions and comparisons the evaluator
/// relies on.
pub mod core;
/// Records and their members.
///
/// Declares the `Record` trait that input records implement, plus a
/// map-backed `DynamicRecord` for callers without a fixed Rust shape.
pub mod record;
/// Static value types.
///
/// Declares `ValueType`, the type vocabulary shared by the compiler, the
/// type-introspection service and the value-conversion service.
pub mod types;
