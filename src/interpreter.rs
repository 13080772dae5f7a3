/// The evaluator module executes compiled trees against records.
///
/// The evaluator walks a typed expression tree, reads members through the
/// `Record` trait, performs arithmetic, logic and comparisons, and calls
/// registered functions. It keeps no state between evaluations.
///
/// # Responsibilities
/// - Evaluates every tree node, applying the null rules of each operator.
/// - Short-circuits `&&` and `||`.
/// - Reports runtime errors such as null dereferences or division by zero.
pub mod evaluator;
/// The lexer module splits expression text into tokens.
///
/// The lexer reads whitespace-free input and produces parentheses, commas,
/// operators and units. Which words and symbol runs are operators is decided
/// by the operator table, not by the lexer itself.
///
/// # Responsibilities
/// - Recognizes quoted literals, numbers, names and root accessors.
/// - Splits symbol runs greedily into registered operator spellings.
/// - Reports unterminated literals and unexpected characters with offsets.
pub mod lexer;
/// The parser module turns tokens into a typed expression tree.
///
/// Tokens are first reordered into postfix with the shunting-yard algorithm
/// and then folded bottom-up by the builders registered for each operator.
///
/// # Responsibilities
/// - Resolves grouping and call argument lists.
/// - Defers literal typing until an operator supplies a target type.
/// - Resolves member names through the type-introspection service.
pub mod parser;
/// The operator table module describes the expression language.
///
/// Every operator is data: a spelling, a precedence, an associativity, an
/// arity and a builder. Functions are registered as call operators.
pub mod table;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values and static types used during compilation
/// and evaluation: booleans, integers, decimals, texts, enumeration variants
/// and records, each of which may be null where the type allows it.
///
/// # Responsibilities
/// - Defines the `Value` enum and the `ValueType` vocabulary.
/// - Declares the `Record` trait that inputs implement.
/// - Provides checked promotion from integer to decimal.
pub mod value;
