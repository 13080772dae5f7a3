use std::{fmt, marker::PhantomData};

use serde::Deserialize;
use tracing::debug;

use crate::{
    ast::Expr,
    error::{CompileError, CompileResult, EvalError, EvalResult},
    interpreter::{
        evaluator::{core::Evaluation, function::core::standard},
        lexer::{Token, Tokens, normalize, tokenize_with_marker},
        parser::{resolve::BuildContext, shunting_yard::to_postfix, tree},
        table::OperatorTable,
        value::{core::Value, record::Record, types::ValueType},
    },
    services::{Schema, TypeIntrospection, ValueConverter},
    util::num::exact_f64,
};

/// Knobs that change how expression text is read.
///
/// Options are usually shipped inside a schema document:
///
/// ```
/// use sift::compiler::CompilerOptions;
///
/// let options: CompilerOptions = serde_json::from_str(r#"{ "implicit_root": false }"#).unwrap();
/// assert_eq!(options.root_marker, '$');
/// assert!(!options.implicit_root);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerOptions {
    /// Prefix that turns a name into a member of the root record (`$age`).
    pub root_marker:   char,
    /// Whether a bare name on the left of an accessor is a root member, so
    /// that `age:25` reads as `$age == 25`.
    pub implicit_root: bool,
    /// The unquoted literal that denotes null.
    pub null_literal:  String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self { root_marker:   '$',
               implicit_root: true,
               null_literal:  "null".to_string(), }
    }
}

/// Turns expression text into typed, executable artifacts.
///
/// The compiler borrows its operator table and services; it holds no other
/// state, so one compiler can serve any number of compilations.
///
/// ```
/// use sift::{
///     compiler::Compiler,
///     interpreter::{
///         evaluator::function::core::standard,
///         table::OperatorTable,
///         value::{record::DynamicRecord, types::ValueType},
///     },
///     services::{RecordSchema, Schema},
/// };
///
/// let schema = Schema::new().with_record("Player",
///                                        RecordSchema::new().property("age", ValueType::Integer)
///                                                           .property("name", ValueType::Text));
/// let table = OperatorTable::standard().with_functions(standard()).unwrap();
/// let root = ValueType::Record("Player".into());
/// let compiler = Compiler::new(&table, &schema, &schema, &root);
///
/// let adult = compiler.compile_predicate("$age >= 18 && len($name) > 2").unwrap();
/// let bob = DynamicRecord::new("Player").with_property("age", 25_i64)
///                                       .with_property("name", "Bob");
///
/// assert!(adult.test(&bob).unwrap());
/// ```
#[derive(Clone, Copy)]
pub struct Compiler<'a> {
    table:     &'a OperatorTable,
    schema:    &'a dyn TypeIntrospection,
    converter: &'a dyn ValueConverter,
    root:      &'a ValueType,
    options:   Option<&'a CompilerOptions>,
}

static DEFAULT_OPTIONS: std::sync::LazyLock<CompilerOptions> =
    std::sync::LazyLock::new(CompilerOptions::default);

impl<'a> Compiler<'a> {
    /// Creates a compiler with default options.
    #[must_use]
    pub fn new(table: &'a OperatorTable,
               schema: &'a dyn TypeIntrospection,
               converter: &'a dyn ValueConverter,
               root: &'a ValueType)
               -> Self {
        Self { table,
               schema,
               converter,
               root,
               options: None }
    }

    #[must_use]
    pub const fn with_options(mut self, options: &'a CompilerOptions) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn options(&self) -> &CompilerOptions {
        self.options.unwrap_or(&DEFAULT_OPTIONS)
    }

    /// Compiles `text` into an expression producing a value of any type.
    ///
    /// # Errors
    /// Any [`CompileError`]; compilation stops at the first one.
    #[tracing::instrument(level = "debug", skip_all, fields(expression = %text))]
    pub fn compile(&self, text: &str) -> CompileResult<CompiledExpression> {
        let normalized = normalize(text);
        let postfix = to_postfix(self.tokens(&normalized), self.table)?;
        let context =
            BuildContext::new(self.schema, self.converter, self.root, self.options());
        let tree::Typed { expr, ty } = tree::build(&postfix, self.table, &context)?;
        debug!(result_type = %ty, tree = %expr, "compiled");

        Ok(CompiledExpression { source: text.to_string(),
                                expr,
                                ty })
    }

    /// Compiles `text` into a predicate.
    ///
    /// The expression must produce `bool` or `bool?`.
    pub fn compile_predicate(&self, text: &str) -> CompileResult<Predicate> {
        let compiled = self.compile(text)?;
        if *compiled.ty.non_null() != ValueType::Bool {
            return Err(CompileError::ResultTypeMismatch { expected: ValueType::Bool.to_string(),
                                                          found:    compiled.ty.to_string(), });
        }
        Ok(Predicate { compiled })
    }

    /// Compiles `text` into an expression whose result converts to `T`.
    ///
    /// ```
    /// use sift::{
    ///     compiler::Compiler,
    ///     error::CompileError,
    ///     interpreter::{table::OperatorTable, value::{record::DynamicRecord, types::ValueType}},
    ///     services::{RecordSchema, Schema},
    /// };
    ///
    /// let schema = Schema::new().with_record("Item",
    ///                                        RecordSchema::new().property("price", ValueType::Integer)
    ///                                                           .property("quantity", ValueType::Integer));
    /// let table = OperatorTable::standard();
    /// let root = ValueType::Record("Item".into());
    /// let compiler = Compiler::new(&table, &schema, &schema, &root);
    ///
    /// let total = compiler.compile_as::<i64>("$price * $quantity").unwrap();
    /// let item = DynamicRecord::new("Item").with_property("price", 7_i64)
    ///                                      .with_property("quantity", 3_i64);
    /// assert_eq!(total.evaluate(&item).unwrap(), 21);
    ///
    /// assert!(matches!(compiler.compile_as::<bool>("$price * $quantity"),
    ///                  Err(CompileError::ResultTypeMismatch { .. })));
    /// ```
    pub fn compile_as<T: FromValue>(&self, text: &str) -> CompileResult<Compiled<T>> {
        let compiled = self.compile(text)?;
        if !T::accepts(&compiled.ty) {
            return Err(CompileError::ResultTypeMismatch { expected: T::describe(),
                                                          found:    compiled.ty.to_string(), });
        }
        Ok(Compiled { compiled,
                      target: PhantomData })
    }

    /// Returns the token texts of `text`, after normalization.
    pub fn tokenize(&self, text: &str) -> CompileResult<Vec<String>> {
        let normalized = normalize(text);
        self.tokens(&normalized).map(|token| token.map(|t| t.text.to_string()))
                                .collect()
    }

    /// Returns the token texts of `text` in postfix order.
    pub fn postfix(&self, text: &str) -> CompileResult<Vec<String>> {
        let normalized = normalize(text);
        let postfix = to_postfix(self.tokens(&normalized), self.table)?;
        Ok(postfix.iter().map(|t: &Token<'_>| t.text.to_string()).collect())
    }
}

impl Compiler<'_> {
    fn tokens<'s>(&self, normalized: &'s str) -> Tokens<'s, '_> {
        tokenize_with_marker(normalized, self.table, self.options().root_marker)
    }
}

impl fmt::Debug for Compiler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
         .field("root", &self.root)
         .field("options", self.options())
         .finish_non_exhaustive()
    }
}

/// Compiles `text` with the standard operators and functions, using `schema`
/// for both type introspection and literal conversion.
///
/// ```
/// use sift::{
///     compile,
///     interpreter::value::{core::Value, record::DynamicRecord},
///     services::Schema,
/// };
///
/// let schema = Schema::from_json(r#"{
///     "root": "Player",
///     "records": { "Player": { "properties": { "age": "integer", "bonus": "integer?" } } }
/// }"#).unwrap();
///
/// let boosted = compile("$age + $bonus", &schema, &schema.root_type().unwrap()).unwrap();
/// let player = DynamicRecord::new("Player").with_property("age", 25_i64)
///                                          .with_property("bonus", 5_i64);
/// assert_eq!(boosted.evaluate(&player).unwrap(), Value::Integer(30));
/// assert_eq!(boosted.result_type().to_string(), "integer?");
/// ```
pub fn compile(text: &str, schema: &Schema, root: &ValueType) -> CompileResult<CompiledExpression> {
    let table = OperatorTable::standard().with_functions(standard())?;
    Compiler::new(&table, schema, schema, root).with_options(&schema.options)
                                               .compile(text)
}

/// A compiled expression producing a value of its static type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    expr:   Expr,
    ty:     ValueType,
}

impl CompiledExpression {
    /// The text the expression was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root of the expression tree.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The static type of the result.
    #[must_use]
    pub const fn result_type(&self) -> &ValueType {
        &self.ty
    }

    /// Evaluates the expression against `input`.
    pub fn evaluate(&self, input: &dyn Record) -> EvalResult<Value> {
        Evaluation::new(input).eval(&self.expr)
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

/// A compiled boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    compiled: CompiledExpression,
}

impl Predicate {
    #[must_use]
    pub const fn expression(&self) -> &CompiledExpression {
        &self.compiled
    }

    /// Tests `input`. A null result tests false.
    pub fn test(&self, input: &dyn Record) -> EvalResult<bool> {
        match self.compiled.evaluate(input)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(EvalError::TypeMismatch { expected: ValueType::Bool.to_string(),
                                                   found:    other.kind(), }),
        }
    }
}

/// A compiled expression whose result converts to `T`.
#[derive(Debug)]
pub struct Compiled<T> {
    compiled: CompiledExpression,
    target:   PhantomData<fn() -> T>,
}

impl<T> Clone for Compiled<T> {
    fn clone(&self) -> Self {
        Self { compiled: self.compiled.clone(),
               target:   PhantomData, }
    }
}

impl<T: FromValue> Compiled<T> {
    #[must_use]
    pub const fn expression(&self) -> &CompiledExpression {
        &self.compiled
    }

    /// Evaluates the expression and converts the result.
    pub fn evaluate(&self, input: &dyn Record) -> EvalResult<T> {
        let value = self.compiled.evaluate(input)?;
        let found = value.kind();
        T::from_value(value).ok_or_else(|| EvalError::TypeMismatch { expected: T::describe(),
                                                                     found })
    }
}

/// Rust types a compiled expression can produce.
pub trait FromValue: Sized {
    /// Whether an expression of static type `ty` can produce `Self`.
    fn accepts(ty: &ValueType) -> bool;

    /// Converts a runtime value, or returns `None` if it does not fit.
    fn from_value(value: Value) -> Option<Self>;

    /// A name for `Self` in error messages.
    fn describe() -> String;
}

impl FromValue for bool {
    fn accepts(ty: &ValueType) -> bool {
        *ty == ValueType::Bool
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool().ok()
    }

    fn describe() -> String {
        ValueType::Bool.to_string()
    }
}

impl FromValue for i64 {
    fn accepts(ty: &ValueType) -> bool {
        *ty == ValueType::Integer
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_integer().ok()
    }

    fn describe() -> String {
        ValueType::Integer.to_string()
    }
}

impl FromValue for f64 {
    fn accepts(ty: &ValueType) -> bool {
        !ty.is_nullable() && ty.is_numeric()
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Decimal(d) => Some(d.0),
            Value::Integer(n) => exact_f64(n),
            _ => None,
        }
    }

    fn describe() -> String {
        ValueType::Decimal.to_string()
    }
}

impl FromValue for String {
    fn accepts(ty: &ValueType) -> bool {
        matches!(ty, ValueType::Text | ValueType::Enum(_))
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_text().ok().map(str::to_string)
    }

    fn describe() -> String {
        ValueType::Text.to_string()
    }
}

impl FromValue for Value {
    fn accepts(_: &ValueType) -> bool {
        true
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }

    fn describe() -> String {
        "any value".to_string()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn accepts(ty: &ValueType) -> bool {
        T::accepts(ty.non_null())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn describe() -> String {
        format!("{}?", T::describe())
    }
}
