use std::fmt;

use crate::{
    error::EvalResult,
    interpreter::{evaluator::function::builtin, value::{core::Value, types::ValueType}},
};

/// Type alias for native function bodies.
///
/// A body receives its evaluated arguments in source order. Arguments declared
/// with a nullable type may be [`Value::Null`]; integers may arrive where a
/// decimal is declared.
pub type NativeFn = fn(&[Value]) -> EvalResult<Value>;

/// A function that expressions can call, such as `len($name)`.
///
/// Functions are registered into an operator table, which turns their name
/// into a call operator taking exactly `parameters.len()` comma separated
/// arguments.
#[derive(Clone)]
pub struct Function {
    name:       String,
    parameters: Vec<ValueType>,
    returns:    ValueType,
    body:       NativeFn,
}

impl Function {
    /// Creates a function from its signature and native body.
    #[must_use]
    pub fn new(name: impl Into<String>,
               parameters: Vec<ValueType>,
               returns: ValueType,
               body: NativeFn)
               -> Self {
        Self { name: name.into(),
               parameters,
               returns,
               body }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[ValueType] {
        &self.parameters
    }

    #[must_use]
    pub const fn returns(&self) -> &ValueType {
        &self.returns
    }

    /// Runs the native body.
    pub fn call(&self, arguments: &[Value]) -> EvalResult<Value> {
        (self.body)(arguments)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
         .field("name", &self.name)
         .field("parameters", &self.parameters)
         .field("returns", &self.returns)
         .finish_non_exhaustive()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.parameters == other.parameters
        && self.returns == other.returns
    }
}

/// Defines the standard functions by generating a signature table.
///
/// Each entry provides:
/// - a string name,
/// - the parameter types,
/// - the return type,
/// - a function pointer implementing the body.
///
/// The macro produces `standard()`, returning every entry as a [`Function`].
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                params: [$($param:expr),* $(,)?],
                returns: $returns:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// The standard function library.
        ///
        /// Not registered by default; add it with
        /// [`OperatorTable::with_functions`](crate::interpreter::table::OperatorTable::with_functions).
        #[must_use]
        pub fn standard() -> Vec<Function> {
            vec![
                $(
                    Function::new($name, vec![$($param),*], $returns, $func),
                )*
            ]
        }
    };
}

builtin_functions! {
    "len"         => { params: [ValueType::Text], returns: ValueType::Integer, func: builtin::len },
    "lower"       => { params: [ValueType::Text], returns: ValueType::Text, func: builtin::lower },
    "contains"    => { params: [ValueType::Text, ValueType::Text], returns: ValueType::Bool, func: builtin::contains },
    "starts_with" => { params: [ValueType::Text, ValueType::Text], returns: ValueType::Bool, func: builtin::starts_with },
    "abs"         => { params: [ValueType::Decimal], returns: ValueType::Decimal, func: builtin::abs },
    "min"         => { params: [ValueType::Decimal, ValueType::Decimal], returns: ValueType::Decimal, func: |args| builtin::min_max("min", args) },
    "max"         => { params: [ValueType::Decimal, ValueType::Decimal], returns: ValueType::Decimal, func: |args| builtin::min_max("max", args) },
}
