/// Standard function implementations.
///
/// Contains the native bodies of the functions in the standard library.
pub mod builtin;

/// Function signatures and the standard library table.
pub mod core;
