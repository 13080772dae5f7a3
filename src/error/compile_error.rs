use std::fmt;

use thiserror::Error;

/// Result type used by every compilation phase.
pub type CompileResult<T> = Result<T, CompileError>;

/// Represents all errors that can occur while compiling an expression.
///
/// Offsets are byte offsets into the normalized (whitespace-free) expression
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The input could not be split into tokens.
    #[error("Error at offset {offset}: {message}.")]
    Tokenization {
        /// Where the malformed literal starts.
        offset:  usize,
        /// What went wrong.
        message: String,
    },
    /// A parenthesis has no partner, or a comma appears outside of a call.
    #[error("Error at offset {offset}: {grouping}.")]
    UnbalancedParentheses {
        /// Offset of the offending token.
        offset:   usize,
        /// Which kind of grouping failed to balance.
        grouping: Grouping,
    },
    /// An operator spelling was registered twice.
    #[error("Operator '{spelling}' is already registered.")]
    DuplicateOperator {
        /// The duplicated spelling.
        spelling: String,
    },
    /// An operator definition was rejected by the table.
    #[error("Operator '{spelling}' cannot be registered: {reason}.")]
    InvalidOperator {
        /// The rejected spelling.
        spelling: String,
        /// Why it was rejected.
        reason:   String,
    },
    /// A spelling was looked up but never registered.
    #[error("Operator '{spelling}' is not registered.")]
    UnknownOperator {
        /// The missing spelling.
        spelling: String,
    },
    /// An operator found fewer operands than its arity requires.
    #[error("Error at offset {offset}: '{operator}' expects {expected} operand(s) but found {found}.")]
    StackUnderflow {
        /// The operator spelling.
        operator: String,
        /// Offset of the operator token.
        offset:   usize,
        /// Operands the operator needs.
        expected: usize,
        /// Operands that were available.
        found:    usize,
    },
    /// An operand had the wrong shape or type for its operator.
    #[error("Error at offset {offset}: Type error in '{operator}': {details}.")]
    TypeResolution {
        /// The operator spelling.
        operator: String,
        /// Offset of the operator token.
        offset:   usize,
        /// Details about the mismatch.
        details:  String,
    },
    /// A member access named a member the type does not have.
    #[error("The type '{type_name}' has neither a property nor a field named '{member}'.")]
    UnknownMember {
        /// The type that was searched.
        type_name: String,
        /// The missing member.
        member:    String,
    },
    /// Both operands of an operator are untyped literals.
    #[error("Error at offset {offset}: '{operator}' cannot infer a type for '{left}' and '{right}'; at least one operand must be typed.")]
    AmbiguousLiteralType {
        /// The operator spelling.
        operator: String,
        /// Offset of the operator token.
        offset:   usize,
        /// Left literal text.
        left:     String,
        /// Right literal text.
        right:    String,
    },
    /// A literal could not be converted to the type it was paired with.
    #[error("Literal '{text}' cannot be converted to {target}: {reason}.")]
    LiteralConversion {
        /// The literal text.
        text:   String,
        /// The target type, as text.
        target: String,
        /// Why the conversion failed.
        reason: String,
    },
    /// Tree building did not end with a single typed expression.
    #[error("Incomplete expression: expected a single typed expression but {remaining} node(s) remain.")]
    IncompleteExpression {
        /// Number of nodes left on the stack.
        remaining: usize,
    },
    /// The expression's type does not fit the requested result type.
    #[error("Expected the expression to produce {expected}, but it produces {found}.")]
    ResultTypeMismatch {
        /// What the caller asked for.
        expected: String,
        /// What the expression produces.
        found:    String,
    },
}

/// The grouping construct an [`CompileError::UnbalancedParentheses`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Plain parentheses.
    Parentheses,
    /// The argument list of a call, reached through a `,` separator.
    CallArguments,
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parentheses => write!(f, "the parentheses don't match"),
            Self::CallArguments => {
                write!(f, "the parentheses don't match in the function call syntax")
            },
        }
    }
}
