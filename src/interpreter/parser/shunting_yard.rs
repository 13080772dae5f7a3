use tracing::trace;

use crate::{
    error::{CompileError, CompileResult, Grouping},
    interpreter::{
        lexer::{Token, TokenKind},
        table::{Arity, OperatorTable},
        value::types::is_identifier,
    },
};

/// Reorders infix tokens into postfix order.
///
/// Units go straight to the output. Binary operators first pop every stacked
/// operator that binds tighter, or equally tight when they are themselves
/// left-associative. Prefix operators and calls never pop anything when they
/// are pushed. A `,` flushes the current call argument, and a `)` flushes its
/// group and then emits the call that owns it, if any.
///
/// ```
/// use sift::interpreter::{lexer::tokenize, parser::shunting_yard::to_postfix, table::OperatorTable};
///
/// let table = OperatorTable::standard();
/// let postfix = to_postfix(tokenize("1+2*3", &table), &table).unwrap();
/// let texts = postfix.iter().map(|t| t.text).collect::<Vec<_>>();
///
/// assert_eq!(texts, ["1", "2", "3", "*", "+"]);
/// ```
///
/// # Errors
/// Returns any tokenization error, `UnknownOperator` for unregistered
/// operator tokens or a name called like a function that was never
/// registered, and `UnbalancedParentheses` for unmatched parentheses or
/// a `,` outside of a call.
pub fn to_postfix<'s>(tokens: impl IntoIterator<Item = CompileResult<Token<'s>>>,
                      table: &OperatorTable)
                      -> CompileResult<Vec<Token<'s>>> {
    let mut output = Vec::new();
    let mut stack: Vec<Token<'s>> = Vec::new();
    let mut previous: Option<Token<'s>> = None;

    for token in tokens {
        let token = token?;
        match token.kind {
            TokenKind::Unit => output.push(token),
            TokenKind::OpenParen => {
                if let Some(callee) = previous
                   && callee.kind == TokenKind::Unit
                   && is_identifier(callee.text)
                {
                    return Err(CompileError::UnknownOperator { spelling: callee.text.to_string() });
                }
                stack.push(token);
            },
            TokenKind::Operator => {
                let operator = table.get(token.text)?;
                if operator.arity() == Arity::Binary {
                    while let Some(top) = stack.last()
                          && top.kind == TokenKind::Operator
                    {
                        let stacked = table.get(top.text)?;
                        let pops = stacked.precedence() > operator.precedence()
                                   || (stacked.precedence() == operator.precedence()
                                       && operator.is_left_associative());
                        if !pops {
                            break;
                        }
                        output.extend(stack.pop());
                    }
                }
                stack.push(token);
            },
            TokenKind::Comma => {
                flush_group(&mut stack, &mut output, token.offset, Grouping::CallArguments)?;
                let in_call = stack.len() >= 2
                              && is_call(table, &stack[stack.len() - 2]);
                if !in_call {
                    return Err(CompileError::UnbalancedParentheses { offset:   token.offset,
                                                                     grouping: Grouping::CallArguments, });
                }
            },
            TokenKind::CloseParen => {
                flush_group(&mut stack, &mut output, token.offset, Grouping::Parentheses)?;
                stack.pop();
                if let Some(top) = stack.last()
                   && is_call(table, top)
                {
                    output.extend(stack.pop());
                }
            },
        }
        previous = Some(token);
    }

    while let Some(top) = stack.pop() {
        if top.kind == TokenKind::OpenParen {
            return Err(CompileError::UnbalancedParentheses { offset:   top.offset,
                                                             grouping: Grouping::Parentheses, });
        }
        output.push(top);
    }

    trace!(postfix = ?output.iter().map(|t| t.text).collect::<Vec<_>>(), "reordered");
    Ok(output)
}

/// Moves operators to the output until an `(` is on top of the stack.
///
/// The parenthesis itself stays on the stack.
fn flush_group<'s>(stack: &mut Vec<Token<'s>>,
                   output: &mut Vec<Token<'s>>,
                   offset: usize,
                   grouping: Grouping)
                   -> CompileResult<()> {
    loop {
        match stack.last() {
            Some(top) if top.kind == TokenKind::OpenParen => return Ok(()),
            Some(_) => output.extend(stack.pop()),
            None => return Err(CompileError::UnbalancedParentheses { offset, grouping }),
        }
    }
}

fn is_call(table: &OperatorTable, token: &Token<'_>) -> bool {
    token.kind == TokenKind::Operator
    && table.lookup(token.text)
            .is_some_and(|operator| matches!(operator.arity(), Arity::Call(_)))
}
