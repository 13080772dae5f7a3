use thiserror::Error;

/// Result type used while evaluating compiled expressions.
pub type EvalResult<T> = Result<T, EvalError>;

/// Represents all errors that can occur while evaluating a compiled expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A plain member access was applied to a null parent.
    #[error("Cannot read member '{member}' of a null value.")]
    NullReference {
        /// The member that was read.
        member: String,
    },
    /// A record did not supply a member its type declares.
    #[error("Record of type '{type_name}' does not supply member '{member}'.")]
    MissingMember {
        /// The record's type name.
        type_name: String,
        /// The missing member.
        member:    String,
    },
    /// A value had a different type than the compiled tree expected.
    #[error("Type mismatch: expected {expected}, found {found}.")]
    TypeMismatch {
        /// The expected type.
        expected: String,
        /// What was found instead.
        found:    String,
    },
    /// Attempted division by zero.
    #[error("Division by zero.")]
    DivisionByZero,
    /// Integer arithmetic overflowed.
    #[error("Integer overflow while trying to compute result.")]
    Overflow,
    /// An integer was too large to be promoted to a decimal exactly.
    #[error("Integer is too large to be represented as a decimal.")]
    PrecisionLoss,
    /// A null value reached an operation that cannot handle it.
    #[error("Unexpected null value in {context}.")]
    UnexpectedNull {
        /// Where the null was encountered.
        context: String,
    },
    /// A registered function failed.
    #[error("Function '{name}' failed: {details}.")]
    Function {
        /// The function name.
        name:    String,
        /// Details about the failure.
        details: String,
    },
}
