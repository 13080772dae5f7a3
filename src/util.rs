/// Numeric conversion helpers.
///
/// Integer to decimal promotion must never round silently, so the value model
/// and the typed result conversions go through [`num::exact_f64`].
pub mod num;
