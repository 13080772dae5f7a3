/// Compilation errors.
///
/// Defines every failure that can occur while turning expression text into a
/// compiled expression: malformed literals, unbalanced grouping, operator table
/// misuse, operand stack underflow, unresolvable members and literal types.
pub mod compile_error;
/// Evaluation errors.
///
/// Contains the errors a compiled expression can raise while it is evaluated
/// against a record, such as null dereferences, arithmetic overflow or a record
/// that does not supply a member its type declares.
pub mod eval_error;

pub use compile_error::{CompileError, CompileResult, Grouping};
pub use eval_error::{EvalError, EvalResult};
