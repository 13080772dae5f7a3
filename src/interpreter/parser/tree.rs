use std::fmt;

use tracing::trace;

use crate::{
    ast::Expr,
    error::{CompileError, CompileResult},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::resolve::BuildContext,
        table::{OperatorTable, Site},
        value::types::ValueType,
    },
};

/// A finished expression together with its static type.
#[derive(Debug, Clone, PartialEq)]
pub struct Typed {
    pub expr: Expr,
    pub ty:   ValueType,
}

/// Literal text whose type will be decided by the operator that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    /// The text as written, quotes included.
    pub text:   String,
    /// Byte offset in the normalized input.
    pub offset: usize,
}

impl Pending {
    /// Whether the text is a double-quoted literal.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.text.len() >= 2 && self.text.starts_with('"') && self.text.ends_with('"')
    }

    /// The text without its surrounding quotes.
    ///
    /// ```
    /// use sift::interpreter::parser::tree::Pending;
    ///
    /// let quoted = Pending { text: "\"Bob\"".into(), offset: 0 };
    /// assert_eq!(quoted.unquoted(), "Bob");
    ///
    /// let bare = Pending { text: "25".into(), offset: 0 };
    /// assert_eq!(bare.unquoted(), "25");
    /// ```
    #[must_use]
    pub fn unquoted(&self) -> &str {
        if self.is_quoted() {
            &self.text[1..self.text.len() - 1]
        } else {
            &self.text
        }
    }
}

/// One entry of the operand stack.
#[derive(Debug, Clone, PartialEq)]
pub enum StackNode {
    Typed(Typed),
    Pending(Pending),
}

impl fmt::Display for StackNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(typed) => write!(f, "{}: {}", typed.expr, typed.ty),
            Self::Pending(pending) => write!(f, "{} (untyped)", pending.text),
        }
    }
}

/// The operand stack used while building the tree.
#[derive(Debug, Default)]
pub struct OperandStack {
    nodes: Vec<StackNode>,
}

impl OperandStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, node: StackNode) {
        self.nodes.push(node);
    }

    /// Pops the topmost operand.
    pub fn pop(&mut self, site: &Site<'_>) -> CompileResult<StackNode> {
        self.nodes.pop().ok_or_else(|| site.underflow(1, 0))
    }

    /// Pops two operands, returned as `(left, right)`.
    pub fn pop_pair(&mut self, site: &Site<'_>) -> CompileResult<(StackNode, StackNode)> {
        if self.nodes.len() < 2 {
            return Err(site.underflow(2, self.nodes.len()));
        }
        let right = self.pop(site)?;
        let left = self.pop(site)?;
        Ok((left, right))
    }

    /// Pops `count` operands, returned in source order.
    pub fn pop_many(&mut self, count: usize, site: &Site<'_>) -> CompileResult<Vec<StackNode>> {
        let len = self.nodes.len();
        if len < count {
            return Err(site.underflow(count, len));
        }
        Ok(self.nodes.split_off(len - count))
    }
}

/// Builds a typed expression tree from postfix tokens.
///
/// Units are pushed as root members when they carry the root marker and as
/// pending literals otherwise. Each operator checks the stack depth against
/// its arity before its builder runs. The build succeeds only if exactly one
/// typed node remains.
///
/// # Errors
/// Returns the first error raised by a builder, `StackUnderflow` when an
/// operator lacks operands, and `IncompleteExpression` when the stack does not
/// end with a single typed node.
pub fn build(postfix: &[Token<'_>],
             table: &OperatorTable,
             context: &BuildContext<'_>)
             -> CompileResult<Typed> {
    let mut stack = OperandStack::new();

    for token in postfix {
        trace!(token = token.text, kind = ?token.kind, depth = stack.len(), "queued token");
        if token.kind == TokenKind::Operator {
            let operator = table.get(token.text)?;
            let site = Site { operator: operator.spelling(),
                              offset:   token.offset, };
            let expected = operator.arity().operands();
            if stack.len() < expected {
                return Err(site.underflow(expected, stack.len()));
            }
            let node = operator.builder().build(&mut stack, context, &site)?;
            stack.push(node);
        } else if let Some(name) = context.root_accessor(token.text) {
            stack.push(StackNode::Typed(context.root_member(name)?));
        } else {
            stack.push(StackNode::Pending(Pending { text:   token.text.to_string(),
                                                    offset: token.offset, }));
        }
    }

    let remaining = stack.len();
    match stack.nodes.pop() {
        Some(StackNode::Typed(typed)) if remaining == 1 => Ok(typed),
        _ => Err(CompileError::IncompleteExpression { remaining }),
    }
}
