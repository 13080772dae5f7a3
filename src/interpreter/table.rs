/// Operators and the operator table.
///
/// Declares `Operator` (spelling, precedence, associativity, arity, builder)
/// and `OperatorTable`, the registry the tokenizer, the shunting-yard
/// converter and the tree builder all read from.
pub mod core;
/// Operator builders.
///
/// A builder turns the operands on the tree builder's stack into a single
/// typed node. The standard operators are variants of `Builder`; callers can
/// plug in domain operators through `Builder::Custom`.
pub mod builder;

pub use self::{
    builder::{Builder, Site},
    core::{Arity, Associativity, Operator, OperatorTable},
};
