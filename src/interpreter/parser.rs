/// Infix to postfix reordering.
///
/// Runs Dijkstra's shunting-yard algorithm over the token stream, driven by
/// the precedence and associativity recorded in the operator table. Grouping
/// parentheses and call argument lists are resolved here and never reach the
/// tree builder.
pub mod shunting_yard;

/// Typed tree construction from postfix tokens.
///
/// Holds the operand stack and its two node shapes: typed expressions and
/// pending literals whose type is not known yet.
pub mod tree;

/// Name and literal resolution against the injected services.
pub mod resolve;
