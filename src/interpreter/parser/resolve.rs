use tracing::trace;

use crate::{
    ast::{Expr, MemberKind},
    compiler::CompilerOptions,
    error::{CompileError, CompileResult},
    interpreter::{
        parser::tree::{Pending, StackNode, Typed},
        table::Site,
        value::{core::Value, types::{ValueType, is_identifier}},
    },
    services::{TypeIntrospection, ValueConverter},
};

/// Everything a builder may consult while building a node.
///
/// The context borrows the services for the duration of one compilation and
/// never mutates them.
#[derive(Clone, Copy)]
pub struct BuildContext<'c> {
    schema:    &'c dyn TypeIntrospection,
    converter: &'c dyn ValueConverter,
    root:      &'c ValueType,
    options:   &'c CompilerOptions,
}

impl<'c> BuildContext<'c> {
    #[must_use]
    pub fn new(schema: &'c dyn TypeIntrospection,
               converter: &'c dyn ValueConverter,
               root: &'c ValueType,
               options: &'c CompilerOptions)
               -> Self {
        Self { schema,
               converter,
               root,
               options }
    }

    /// The type of the expression input.
    #[must_use]
    pub const fn root_type(&self) -> &ValueType {
        self.root
    }

    #[must_use]
    pub const fn options(&self) -> &CompilerOptions {
        self.options
    }

    /// Returns the member name if `text` is a root accessor such as `$age`.
    #[must_use]
    pub fn root_accessor<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.strip_prefix(self.options.root_marker)
            .filter(|name| is_identifier(name))
    }

    /// Resolves `name` as a member of the expression input.
    pub fn root_member(&self, name: &str) -> CompileResult<Typed> {
        let input = Typed { expr: Expr::Input,
                            ty:   self.root.clone(), };
        self.resolve_member(input, name, false)
    }

    /// Resolves member `name` of a typed record expression.
    ///
    /// Properties take priority over fields. A conditional access always has
    /// a nullable result type.
    pub fn resolve_member(&self,
                          parent: Typed,
                          name: &str,
                          conditional: bool)
                          -> CompileResult<Typed> {
        let owner = parent.ty.non_null();
        let unknown = || CompileError::UnknownMember { type_name: owner.to_string(),
                                                       member:    name.to_string(), };
        if !owner.is_record() {
            return Err(unknown());
        }

        let (kind, ty) = if let Some(ty) = self.schema.property_type(owner, name) {
            (MemberKind::Property, ty)
        } else if let Some(ty) = self.schema.field_type(owner, name) {
            (MemberKind::Field, ty)
        } else {
            return Err(unknown());
        };
        trace!(owner = %owner, member = name, ?kind, ty = %ty, "resolved member");

        let parent = Box::new(parent.expr);
        let name = name.to_string();
        Ok(if conditional {
               let ty = ty.nullable();
               Typed { expr: Expr::ConditionalMember { parent,
                                                       name,
                                                       kind,
                                                       ty: ty.clone() },
                       ty }
           } else {
               Typed { expr: Expr::Member { parent,
                                            name,
                                            kind,
                                            ty: ty.clone() },
                       ty }
           })
    }

    /// Converts a pending literal into a typed literal of type `target`.
    ///
    /// An unquoted null literal becomes a null of the nullable target type.
    /// Anything else goes through the value converter.
    pub fn resolve_literal(&self, pending: &Pending, target: &ValueType) -> CompileResult<Typed> {
        if !pending.is_quoted() && pending.text == self.options.null_literal {
            return Ok(Typed { expr: Expr::Literal { value: Value::Null,
                                                    ty:    target.clone().nullable(), },
                              ty:   target.clone().nullable(), });
        }

        let base = target.non_null();
        let value = self.converter
                        .convert(pending.unquoted(), base)
                        .map_err(|failure| CompileError::LiteralConversion {
                            text:   pending.text.clone(),
                            target: base.to_string(),
                            reason: failure.to_string(),
                        })?;
        trace!(text = %pending.text, target = %base, %value, "converted literal");

        Ok(Typed { expr: Expr::Literal { value,
                                         ty: base.clone() },
                   ty:   base.clone(), })
    }

    /// Unwraps a typed node, rejecting pending literals.
    pub fn require_typed(&self, node: StackNode, site: &Site<'_>) -> CompileResult<Typed> {
        match node {
            StackNode::Typed(typed) => Ok(typed),
            StackNode::Pending(pending) => {
                Err(site.type_error(format!("'{}' has no type here; operands of '{}' must be \
                                             typed expressions",
                                            pending.text, site.operator)))
            },
        }
    }

    /// Types both operands of a comparison.
    ///
    /// A pending operand takes the type of its typed sibling. Two pending
    /// operands are ambiguous.
    pub fn pair(&self,
                left: StackNode,
                right: StackNode,
                site: &Site<'_>)
                -> CompileResult<(Typed, Typed)> {
        match (left, right) {
            (StackNode::Typed(left), StackNode::Typed(right)) => Ok((left, right)),
            (StackNode::Typed(left), StackNode::Pending(right)) => {
                let right = self.resolve_literal(&right, &left.ty)?;
                Ok((left, right))
            },
            (StackNode::Pending(left), StackNode::Typed(right)) => {
                let left = self.resolve_literal(&left, &right.ty)?;
                Ok((left, right))
            },
            (StackNode::Pending(left), StackNode::Pending(right)) => {
                Err(CompileError::AmbiguousLiteralType { operator: site.operator.to_string(),
                                                         offset:   site.offset,
                                                         left:     left.text,
                                                         right:    right.text, })
            },
        }
    }
}
