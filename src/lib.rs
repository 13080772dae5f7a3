//! # sift
//!
//! sift compiles textual filter and value expressions such as
//! `age:25 && $guild?:name == "Knights"` into typed, reusable evaluators over
//! records. Operators, their precedence and the way their operands combine are
//! all data in an operator table, and record shapes and literal conversions
//! are injected as services, so the same pipeline serves any domain vocabulary.
//!
//! Compilation runs in four phases: tokenization driven by the table's
//! spellings, shunting-yard reordering into postfix, bottom-up tree building
//! with lazy literal typing, and finally evaluation of the typed tree.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of compiled expressions.
///
/// This module declares the `Expr` enum and the operator enums that represent
/// a compiled expression as a typed tree. The tree is built by the tree
/// builder and walked by the evaluator.
///
/// # Responsibilities
/// - Defines one node per kind of operation: members, literals, operators and
///   calls.
/// - Records the member kind and declared type wherever the evaluator needs
///   them.
/// - Prints trees in a fully parenthesized form for diagnostics.
pub mod ast;
/// The public entry points for compiling expressions.
///
/// This module ties the operator table, the services and the compilation
/// phases together behind `Compiler`, and defines the compiled artifacts that
/// callers keep and evaluate.
///
/// # Responsibilities
/// - Runs normalization, tokenization, reordering and tree building.
/// - Checks result types for predicates and typed expressions.
/// - Carries the compiler options.
pub mod compiler;
/// Provides unified error types for compilation and evaluation.
///
/// This module defines all errors that can be raised while compiling
/// expression text or evaluating a compiled expression. Compile errors carry
/// the offending operator and its offset in the normalized input.
///
/// # Responsibilities
/// - Defines one error enum per phase.
/// - Attaches offsets and operator spellings for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// The compilation pipeline and runtime.
///
/// This module holds the operator table, the tokenizer, the shunting-yard
/// converter, the tree builder, the evaluator and the value model.
pub mod interpreter;
/// The services the compiler consults.
///
/// Type introspection answers what members a record type has; value conversion
/// turns literal text into values once their type is known.
pub mod services;
/// General utilities for safe numeric conversion.
///
/// This module provides conversion routines used by the value model and the
/// evaluator. Integers are promoted to decimals only when no precision is
/// lost.
pub mod util;

pub use compiler::{
    Compiled, CompiledExpression, Compiler, CompilerOptions, FromValue, Predicate, compile,
};
pub use error::{CompileError, CompileResult, EvalError, EvalResult};
