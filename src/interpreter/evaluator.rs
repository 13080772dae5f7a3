/// Core evaluation logic and record access.
///
/// Walks a compiled tree against one input record. Member reads go through
/// the [`Record`](crate::interpreter::value::record::Record) trait.
pub mod core;

/// Arithmetic and comparison on runtime values.
///
/// Implements checked integer arithmetic, decimal promotion, and the null
/// rules of comparisons.
pub mod binary;

/// Function evaluation.
///
/// Holds the function type used by call operators and the standard library.
pub mod function;
