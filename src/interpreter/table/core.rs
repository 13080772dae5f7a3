use std::{collections::HashMap, sync::Arc};

use crate::{
    ast::{BinaryOperator, ComparisonOperator},
    error::{CompileError, CompileResult},
    interpreter::{evaluator::function::core::Function, table::builder::Builder},
};

/// Precedence of the member access operators.
pub const ACCESS_PRECEDENCE: u8 = 11;
/// Precedence given to registered functions; calls bind tightest.
pub const CALL_PRECEDENCE: u8 = 12;

/// Which side an operator groups towards when precedences tie.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Associativity {
    /// `a - b - c` groups as `(a - b) - c`.
    Left,
    /// `!!a` groups as `!(!a)`.
    Right,
}

/// How many operands an operator consumes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    /// One operand, written after the operator.
    Unary,
    /// Two operands, written around the operator.
    Binary,
    /// A call taking this many comma separated arguments in parentheses.
    Call(usize),
}

impl Arity {
    /// The number of operands taken from the stack.
    #[must_use]
    pub const fn operands(self) -> usize {
        match self {
            Self::Unary => 1,
            Self::Binary => 2,
            Self::Call(n) => n,
        }
    }
}

/// An operator definition.
///
/// Operators are immutable once created and are only ever read by the
/// compilation phases.
#[derive(Debug, Clone)]
pub struct Operator {
    spelling:      String,
    precedence:    u8,
    associativity: Associativity,
    arity:         Arity,
    builder:       Builder,
}

impl Operator {
    /// Creates an operator definition.
    ///
    /// The definition is validated when it is registered, not here.
    #[must_use]
    pub fn new(spelling: impl Into<String>,
               precedence: u8,
               associativity: Associativity,
               arity: Arity,
               builder: Builder)
               -> Self {
        Self { spelling: spelling.into(),
               precedence,
               associativity,
               arity,
               builder }
    }

    /// Creates a left-associative binary operator.
    #[must_use]
    pub fn binary(spelling: impl Into<String>, precedence: u8, builder: Builder) -> Self {
        Self::new(spelling, precedence, Associativity::Left, Arity::Binary, builder)
    }

    #[must_use]
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Higher binds tighter.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        self.precedence
    }

    #[must_use]
    pub const fn associativity(&self) -> Associativity {
        self.associativity
    }

    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    #[must_use]
    pub const fn builder(&self) -> &Builder {
        &self.builder
    }

    #[must_use]
    pub const fn is_left_associative(&self) -> bool {
        matches!(self.associativity, Associativity::Left)
    }
}

/// Tests whether `c` may appear in a symbolic operator spelling.
///
/// Letters, digits, `_`, quotes, the root marker, parentheses, the comma and
/// whitespace are reserved for other tokens.
#[must_use]
pub fn is_symbol_char(c: char) -> bool {
    !(c.is_ascii_alphanumeric()
      || c.is_whitespace()
      || matches!(c, '_' | '"' | '$' | '(' | ')' | ','))
}

/// Tests whether `c` may appear in a word, i.e. an identifier.
#[must_use]
pub const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The registry of operators, keyed by spelling.
///
/// A table is filled once and then only read; compiling many expressions
/// against the same table, from any number of threads, is safe.
///
/// ```
/// use sift::interpreter::table::OperatorTable;
///
/// let table = OperatorTable::standard();
/// assert!(table.contains("&&"));
/// assert_eq!(table.lookup("*").unwrap().precedence(), 8);
/// assert!(table.lookup("**").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    operators: HashMap<String, Operator>,
    /// Symbolic spellings, longest first.
    symbolic:  Vec<String>,
}

impl OperatorTable {
    /// Creates a table without any operators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the standard operators.
    ///
    /// | spelling              | meaning                  | precedence |
    /// |-----------------------|--------------------------|------------|
    /// | `:` `.` `?:`          | member access, null-safe | 11         |
    /// | `!`                   | logical not (right)      | 10         |
    /// | `*` `/`               | multiplicative           | 8          |
    /// | `+` `-`               | additive                 | 7          |
    /// | `<` `<=` `>` `>=`     | relational               | 6          |
    /// | `==` `!=`             | equality                 | 5          |
    /// | `&`                   | eager and                | 4          |
    /// | `\|`                  | eager or                 | 3          |
    /// | `&&`                  | short-circuit and        | 2          |
    /// | `\|\|`                | short-circuit or         | 1          |
    #[must_use]
    pub fn standard() -> Self {
        use BinaryOperator::{Add, And, AndAlso, Div, Mul, Or, OrElse, Sub};
        use ComparisonOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        let operators = [Operator::binary(":",
                                          ACCESS_PRECEDENCE,
                                          Builder::Access { conditional: false }),
                         Operator::binary(".",
                                          ACCESS_PRECEDENCE,
                                          Builder::Access { conditional: false }),
                         Operator::binary("?:",
                                          ACCESS_PRECEDENCE,
                                          Builder::Access { conditional: true }),
                         Operator::new("!", 10, Associativity::Right, Arity::Unary, Builder::Not),
                         Operator::binary("*", 8, Builder::Arithmetic(Mul)),
                         Operator::binary("/", 8, Builder::Arithmetic(Div)),
                         Operator::binary("+", 7, Builder::Arithmetic(Add)),
                         Operator::binary("-", 7, Builder::Arithmetic(Sub)),
                         Operator::binary("<", 6, Builder::Comparison(Less)),
                         Operator::binary("<=", 6, Builder::Comparison(LessEqual)),
                         Operator::binary(">", 6, Builder::Comparison(Greater)),
                         Operator::binary(">=", 6, Builder::Comparison(GreaterEqual)),
                         Operator::binary("==", 5, Builder::Comparison(Equal)),
                         Operator::binary("!=", 5, Builder::Comparison(NotEqual)),
                         Operator::binary("&", 4, Builder::Logical(And)),
                         Operator::binary("|", 3, Builder::Logical(Or)),
                         Operator::binary("&&", 2, Builder::Logical(AndAlso)),
                         Operator::binary("||", 1, Builder::Logical(OrElse))];

        let mut table = Self::new();
        for operator in operators {
            table.insert(operator);
        }
        table
    }

    /// Registers every function in `functions`, e.g. the standard library.
    pub fn with_functions(mut self,
                          functions: impl IntoIterator<Item = Function>)
                          -> CompileResult<Self> {
        for function in functions {
            self.register_function(function)?;
        }
        Ok(self)
    }

    /// Registers an operator.
    ///
    /// # Errors
    /// - `DuplicateOperator` if the spelling is already taken.
    /// - `InvalidOperator` if the spelling is empty, mixes word and symbol
    ///   characters, or the builder cannot take the declared arity.
    pub fn register(&mut self, operator: Operator) -> CompileResult<()> {
        let spelling = operator.spelling();
        if self.operators.contains_key(spelling) {
            return Err(CompileError::DuplicateOperator { spelling: spelling.to_string() });
        }
        let invalid = |reason: &str| CompileError::InvalidOperator { spelling: spelling.to_string(),
                                                                     reason:   reason.to_string(), };
        if spelling.is_empty() {
            return Err(invalid("spellings must not be empty"));
        }
        let is_word = spelling.chars().all(is_word_char)
                      && !spelling.starts_with(|c: char| c.is_ascii_digit());
        if !is_word && !spelling.chars().all(is_symbol_char) {
            return Err(invalid("spellings must be either an identifier or only symbol characters"));
        }
        if let Some(expected) = operator.builder().arity()
           && expected != operator.arity()
        {
            return Err(invalid(&format!("the builder takes {expected:?} operands, not {:?}",
                                        operator.arity())));
        }
        self.insert(operator);
        Ok(())
    }

    /// Registers a function as a call operator named after it.
    ///
    /// Calls bind tighter than every standard operator and take exactly as many
    /// arguments as the function declares.
    pub fn register_function(&mut self, function: Function) -> CompileResult<()> {
        let arity = Arity::Call(function.parameters().len());
        self.register(Operator::new(function.name().to_string(),
                                    CALL_PRECEDENCE,
                                    Associativity::Right,
                                    arity,
                                    Builder::Call(Arc::new(function))))
    }

    /// Looks up an operator by spelling.
    #[must_use]
    pub fn lookup(&self, spelling: &str) -> Option<&Operator> {
        self.operators.get(spelling)
    }

    /// Looks up an operator, failing with `UnknownOperator` if it is missing.
    pub fn get(&self, spelling: &str) -> CompileResult<&Operator> {
        self.lookup(spelling)
            .ok_or_else(|| CompileError::UnknownOperator { spelling: spelling.to_string() })
    }

    #[must_use]
    pub fn contains(&self, spelling: &str) -> bool {
        self.operators.contains_key(spelling)
    }

    /// Every registered spelling, in no particular order.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    /// Symbolic spellings, longest first, so that `&&` is tried before `&`.
    #[must_use]
    pub fn symbolic_spellings(&self) -> &[String] {
        &self.symbolic
    }

    fn insert(&mut self, operator: Operator) {
        let spelling = operator.spelling().to_string();
        if spelling.chars().all(is_symbol_char) {
            self.symbolic.push(spelling.clone());
            self.symbolic
                .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        }
        self.operators.insert(spelling, operator);
    }
}
