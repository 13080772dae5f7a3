use crate::{
    error::{EvalError, EvalResult},
    interpreter::value::core::Value,
};

/// Returns the number of characters in a text.
pub fn len(args: &[Value]) -> EvalResult<Value> {
    let text = argument(args, 0, "len")?.as_text()?;
    i64::try_from(text.chars().count()).map(Value::Integer)
                                       .map_err(|_| EvalError::Overflow)
}

/// Lowercases a text.
pub fn lower(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::from(argument(args, 0, "lower")?.as_text()?.to_lowercase()))
}

/// Tests whether the first text contains the second.
pub fn contains(args: &[Value]) -> EvalResult<Value> {
    let haystack = argument(args, 0, "contains")?.as_text()?;
    let needle = argument(args, 1, "contains")?.as_text()?;
    Ok(Value::Bool(haystack.contains(needle)))
}

/// Tests whether the first text starts with the second.
pub fn starts_with(args: &[Value]) -> EvalResult<Value> {
    let text = argument(args, 0, "starts_with")?.as_text()?;
    let prefix = argument(args, 1, "starts_with")?.as_text()?;
    Ok(Value::Bool(text.starts_with(prefix)))
}

/// Absolute value, always as a decimal.
pub fn abs(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::from(argument(args, 0, "abs")?.as_decimal()?.abs()))
}

/// Shared implementation of `min` and `max`.
///
/// # Parameters
/// - `name`: Either `"min"` or `"max"`.
/// - `args`: Exactly two numeric arguments.
pub fn min_max(name: &str, args: &[Value]) -> EvalResult<Value> {
    let a = argument(args, 0, name)?.as_decimal()?;
    let b = argument(args, 1, name)?.as_decimal()?;
    Ok(Value::from(if name == "min" { a.min(b) } else { a.max(b) }))
}

fn argument<'a>(args: &'a [Value], index: usize, name: &str) -> EvalResult<&'a Value> {
    args.get(index).ok_or_else(|| EvalError::Function { name:    name.to_string(),
                                                         details: format!("missing argument {}",
                                                                          index + 1), })
}
