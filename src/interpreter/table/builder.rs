use std::{fmt, sync::Arc};

use crate::{
    ast::{BinaryOperator, ComparisonOperator, Expr, UnaryOperator},
    error::{CompileError, CompileResult},
    interpreter::{
        evaluator::function::core::Function,
        parser::{
            resolve::BuildContext,
            tree::{OperandStack, StackNode, Typed},
        },
        table::core::Arity,
        value::{
            core::Value,
            types::{ValueType, is_identifier},
        },
    },
};

/// Signature of a caller-supplied builder.
///
/// The tree builder guarantees that the stack holds at least as many operands
/// as the operator's arity. The builder must pop exactly that many and return
/// the node to push in their place.
pub type CustomBuilder = Arc<dyn Fn(&mut OperandStack, &BuildContext<'_>, &Site<'_>)
                                    -> CompileResult<StackNode>
                                + Send
                                + Sync>;

/// Where an operator occurs, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'a> {
    /// The operator spelling.
    pub operator: &'a str,
    /// Byte offset of the operator in the normalized input.
    pub offset:   usize,
}

impl Site<'_> {
    /// Creates a `TypeResolution` error for this operator.
    #[must_use]
    pub fn type_error(&self, details: impl Into<String>) -> CompileError {
        CompileError::TypeResolution { operator: self.operator.to_string(),
                                       offset:   self.offset,
                                       details:  details.into(), }
    }

    /// Creates a `StackUnderflow` error for this operator.
    #[must_use]
    pub fn underflow(&self, expected: usize, found: usize) -> CompileError {
        CompileError::StackUnderflow { operator: self.operator.to_string(),
                                       offset: self.offset,
                                       expected,
                                       found }
    }
}

/// Builds one tree node from the operands on the stack.
///
/// Operators are plain data; the builder variant decides how their operands
/// combine.
#[derive(Clone)]
pub enum Builder {
    /// Member access. Accepts a pending left operand as a root member and
    /// turns access on a scalar into an equality match (`age:25`).
    Access {
        /// Whether a null parent yields null instead of an error.
        conditional: bool,
    },
    /// Logical negation of a boolean.
    Not,
    /// Arithmetic on two typed numeric operands.
    Arithmetic(BinaryOperator),
    /// Eager or short-circuit logic on two booleans.
    Logical(BinaryOperator),
    /// Comparison; a pending operand takes the type of its typed sibling.
    Comparison(ComparisonOperator),
    /// A call into the function registry.
    Call(Arc<Function>),
    /// A caller-supplied builder.
    Custom(CustomBuilder),
}

impl Builder {
    /// Wraps a closure as a custom builder.
    ///
    /// ```
    /// use sift::{
    ///     ast::{ComparisonOperator, Expr},
    ///     interpreter::{
    ///         parser::tree::{StackNode, Typed},
    ///         table::{Builder, Operator, OperatorTable},
    ///         value::types::ValueType,
    ///     },
    /// };
    ///
    /// // `a <> b` as an alternative spelling of `!=`.
    /// let mut table = OperatorTable::standard();
    /// table.register(Operator::binary("<>", 5, Builder::custom(|stack, context, site| {
    ///     let (left, right) = stack.pop_pair(site)?;
    ///     let (left, right) = context.pair(left, right, site)?;
    ///     Ok(StackNode::Typed(Typed { expr: Expr::Comparison { op:    ComparisonOperator::NotEqual,
    ///                                                          left:  Box::new(left.expr),
    ///                                                          right: Box::new(right.expr), },
    ///                                 ty:   ValueType::Bool }))
    /// }))).unwrap();
    /// assert!(table.contains("<>"));
    /// ```
    pub fn custom<F>(builder: F) -> Self
        where F: Fn(&mut OperandStack, &BuildContext<'_>, &Site<'_>) -> CompileResult<StackNode>
                  + Send
                  + Sync
                  + 'static
    {
        Self::Custom(Arc::new(builder))
    }

    /// The arity this builder requires, if it is fixed.
    #[must_use]
    pub fn arity(&self) -> Option<Arity> {
        match self {
            Self::Not => Some(Arity::Unary),
            Self::Access { .. } | Self::Arithmetic(_) | Self::Logical(_) | Self::Comparison(_) => {
                Some(Arity::Binary)
            },
            Self::Call(function) => Some(Arity::Call(function.parameters().len())),
            Self::Custom(_) => None,
        }
    }

    /// Pops this builder's operands and returns the resulting node.
    pub fn build(&self,
                 stack: &mut OperandStack,
                 context: &BuildContext<'_>,
                 site: &Site<'_>)
                 -> CompileResult<StackNode> {
        match self {
            Self::Access { conditional } => build_access(stack, context, site, *conditional),
            Self::Not => build_not(stack, context, site),
            Self::Arithmetic(op) => build_arithmetic(*op, stack, context, site),
            Self::Logical(op) => build_logical(*op, stack, context, site),
            Self::Comparison(op) => {
                let (left, right) = stack.pop_pair(site)?;
                let (left, right) = context.pair(left, right, site)?;
                comparison(*op, left, right, site).map(StackNode::Typed)
            },
            Self::Call(function) => build_call(function, stack, context, site),
            Self::Custom(builder) => builder(stack, context, site),
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access { conditional } => {
                f.debug_struct("Access").field("conditional", conditional).finish()
            },
            Self::Not => write!(f, "Not"),
            Self::Arithmetic(op) => write!(f, "Arithmetic({op})"),
            Self::Logical(op) => write!(f, "Logical({op})"),
            Self::Comparison(op) => write!(f, "Comparison({op})"),
            Self::Call(function) => write!(f, "Call({})", function.name()),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Builds a member access.
///
/// The right operand must be a pending member name. The left operand is a
/// typed parent, or a pending name resolved against the root record. When the
/// parent is a scalar, the right operand is a literal instead and the access
/// becomes `parent == literal`.
fn build_access(stack: &mut OperandStack,
                context: &BuildContext<'_>,
                site: &Site<'_>,
                conditional: bool)
                -> CompileResult<StackNode> {
    let (left, right) = stack.pop_pair(site)?;
    let StackNode::Pending(member) = right else {
        return Err(site.type_error("the right operand must be a member name"));
    };

    let parent = match left {
        StackNode::Typed(parent) => parent,
        StackNode::Pending(name)
            if context.options().implicit_root && is_identifier(&name.text) =>
        {
            context.root_member(&name.text)?
        },
        StackNode::Pending(name) => {
            return Err(site.type_error(format!("'{}' is not a typed expression", name.text)));
        },
    };

    if parent.ty.is_record() {
        if member.is_quoted() || !is_identifier(&member.text) {
            return Err(site.type_error(format!("'{}' is not a member name", member.text)));
        }
        return context.resolve_member(parent, &member.text, conditional)
                      .map(StackNode::Typed);
    }

    let literal = context.resolve_literal(&member, &parent.ty)?;
    comparison(ComparisonOperator::Equal, parent, literal, site).map(StackNode::Typed)
}

fn build_not(stack: &mut OperandStack,
             context: &BuildContext<'_>,
             site: &Site<'_>)
             -> CompileResult<StackNode> {
    let operand = context.require_typed(stack.pop(site)?, site)?;
    if operand.ty != ValueType::Bool {
        return Err(site.type_error(format!("expected a bool operand, found {}", operand.ty)));
    }
    Ok(StackNode::Typed(Typed { expr: Expr::Unary { op:      UnaryOperator::Not,
                                                    operand: Box::new(operand.expr), },
                                ty:   ValueType::Bool, }))
}

fn build_arithmetic(op: BinaryOperator,
                    stack: &mut OperandStack,
                    context: &BuildContext<'_>,
                    site: &Site<'_>)
                    -> CompileResult<StackNode> {
    let (left, right) = stack.pop_pair(site)?;
    let left = context.require_typed(left, site)?;
    let right = context.require_typed(right, site)?;
    if !left.ty.is_numeric() || !right.ty.is_numeric() {
        return Err(site.type_error(format!("cannot apply '{op}' to {} and {}",
                                           left.ty, right.ty)));
    }

    let base = if *left.ty.non_null() == ValueType::Integer
                  && *right.ty.non_null() == ValueType::Integer
    {
        ValueType::Integer
    } else {
        ValueType::Decimal
    };
    let ty = if left.ty.is_nullable() || right.ty.is_nullable() {
        base.nullable()
    } else {
        base
    };

    Ok(StackNode::Typed(Typed { expr: Expr::Binary { op,
                                                     left: Box::new(left.expr),
                                                     right: Box::new(right.expr) },
                                ty }))
}

fn build_logical(op: BinaryOperator,
                 stack: &mut OperandStack,
                 context: &BuildContext<'_>,
                 site: &Site<'_>)
                 -> CompileResult<StackNode> {
    let (left, right) = stack.pop_pair(site)?;
    let left = context.require_typed(left, site)?;
    let right = context.require_typed(right, site)?;
    if left.ty != ValueType::Bool || right.ty != ValueType::Bool {
        return Err(site.type_error(format!("expected two bool operands, found {} and {}",
                                           left.ty, right.ty)));
    }
    Ok(StackNode::Typed(Typed { expr: Expr::Binary { op,
                                                     left: Box::new(left.expr),
                                                     right: Box::new(right.expr) },
                                ty:   ValueType::Bool, }))
}

/// Checks that two typed operands can be compared with `op` and builds the
/// comparison.
///
/// Equality needs the same type, or two numbers; a record only compares with
/// the null literal. Ordering needs two numbers or two texts. Nullability is
/// ignored.
pub fn comparison(op: ComparisonOperator,
                  left: Typed,
                  right: Typed,
                  site: &Site<'_>)
                  -> CompileResult<Typed> {
    let (a, b) = (left.ty.non_null(), right.ty.non_null());
    let numeric = left.ty.is_numeric() && right.ty.is_numeric();
    let comparable = if op.is_equality() {
        let null_check = is_null_literal(&left) || is_null_literal(&right);
        numeric || (a == b && (!a.is_record() || null_check))
    } else {
        numeric || (*a == ValueType::Text && *b == ValueType::Text)
    };
    if !comparable {
        return Err(site.type_error(format!("cannot compare {} with {}", left.ty, right.ty)));
    }
    Ok(Typed { expr: Expr::Comparison { op,
                                        left: Box::new(left.expr),
                                        right: Box::new(right.expr) },
               ty:   ValueType::Bool, })
}

fn is_null_literal(node: &Typed) -> bool {
    matches!(node.expr, Expr::Literal { value: Value::Null, .. })
}

fn build_call(function: &Arc<Function>,
              stack: &mut OperandStack,
              context: &BuildContext<'_>,
              site: &Site<'_>)
              -> CompileResult<StackNode> {
    let operands = stack.pop_many(function.parameters().len(), site)?;
    let mut arguments = Vec::with_capacity(operands.len());

    for (i, (operand, parameter)) in operands.into_iter()
                                             .zip(function.parameters())
                                             .enumerate()
    {
        let argument = match operand {
            StackNode::Typed(typed) if typed.ty.is_assignable_to(parameter) => typed,
            StackNode::Typed(typed) => {
                return Err(site.type_error(format!("argument {} must be {parameter}, found {}",
                                                   i + 1,
                                                   typed.ty)));
            },
            StackNode::Pending(pending) => context.resolve_literal(&pending, parameter)?,
        };
        arguments.push(argument.expr);
    }

    Ok(StackNode::Typed(Typed { expr: Expr::Call { function: Arc::clone(function),
                                                   arguments },
                                ty:   function.returns().clone(), }))
}
