use std::{fmt, sync::Arc};

use crate::interpreter::{
    evaluator::function::core::Function,
    value::{core::Value, types::ValueType},
};

/// Whether a member was resolved as a property or as a field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// A property; preferred when both exist.
    Property,
    /// A field.
    Field,
}

/// A node of the compiled expression tree.
///
/// Trees are built bottom-up by the tree builder, fully typed, and never
/// change afterwards. Every variant that produces a value carries enough type
/// information for the evaluator to run without consulting the services again.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The input record the expression is evaluated against.
    Input,
    /// A constant, already converted to its target type.
    Literal {
        /// The constant value.
        value: Value,
        /// The type the literal was resolved to.
        ty:    ValueType,
    },
    /// Plain member access; reading through a null parent is an error.
    Member {
        /// The record being read.
        parent: Box<Self>,
        /// Name of the member.
        name:   String,
        /// Property or field.
        kind:   MemberKind,
        /// Declared type of the member.
        ty:     ValueType,
    },
    /// Null-safe member access; a null parent yields null.
    ConditionalMember {
        /// The record being read.
        parent: Box<Self>,
        /// Name of the member.
        name:   String,
        /// Property or field.
        kind:   MemberKind,
        /// Nullable type of the member.
        ty:     ValueType,
    },
    /// A unary operation.
    Unary {
        /// The operator to apply.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Self>,
    },
    /// An arithmetic or logical binary operation.
    Binary {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// A comparison producing a boolean.
    Comparison {
        /// The operator.
        op:    ComparisonOperator,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// A call into the function registry.
    Call {
        /// The function being called.
        function:  Arc<Function>,
        /// Arguments, in source order.
        arguments: Vec<Self>,
    },
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Logical NOT (e.g. `!x`).
    Not,
}

/// Represents an arithmetic or logical binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Eager logical and (`&`), both sides are evaluated
    And,
    /// Eager logical or (`|`), both sides are evaluated
    Or,
    /// Short-circuit logical and (`&&`)
    AndAlso,
    /// Short-circuit logical or (`||`)
    OrElse,
}

impl BinaryOperator {
    /// Whether this operator works on booleans rather than numbers.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::AndAlso | Self::OrElse)
    }
}

/// Represents a comparison operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

impl ComparisonOperator {
    /// Whether this operator tests equality rather than ordering.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::And => "&",
            Self::Or => "|",
            Self::AndAlso => "&&",
            Self::OrElse => "||",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
        };
        write!(f, "{operator}")
    }
}

/// Renders the tree fully parenthesized, e.g. `($age == 25)`.
///
/// Member reads of the input record print as `$name`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "$"),
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Member { parent, name, .. } => match parent.as_ref() {
                Self::Input => write!(f, "${name}"),
                parent => write!(f, "{parent}:{name}"),
            },
            Self::ConditionalMember { parent, name, .. } => match parent.as_ref() {
                Self::Input => write!(f, "${name}"),
                parent => write!(f, "{parent}?:{name}"),
            },
            Self::Unary { op, operand } => write!(f, "{op}{operand}"),
            Self::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            Self::Comparison { op, left, right } => write!(f, "({left} {op} {right})"),
            Self::Call { function, arguments } => {
                write!(f, "{}(", function.name())?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            },
        }
    }
}
