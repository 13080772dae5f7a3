use std::collections::VecDeque;

use logos::{Lexer, Logos};

use crate::{
    error::{CompileError, CompileResult},
    interpreter::table::{
        OperatorTable,
        core::{is_symbol_char, is_word_char},
    },
};

/// The raw lexical classes, before operator spellings are applied.
///
/// The lexer itself knows nothing about operators: words and runs of symbol
/// characters are classified against the operator table afterwards.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(extras = char)]
enum Lexeme {
    /// `(`
    #[token("(")]
    OpenParen,
    /// `)`
    #[token(")")]
    CloseParen,
    /// `,`
    #[token(",")]
    Comma,
    /// A double-quoted literal such as `"Bob"`, quotes included.
    #[token("\"", quoted)]
    Quoted,
    /// Numeric literal tokens, such as `42` or `2.5`.
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    /// Identifiers such as `age`, optionally with the root marker (`$age`).
    #[regex(r"\$?[A-Za-z_][A-Za-z0-9_]*")]
    Word,
    /// A maximal run of symbol characters, such as `==` or `:-`, or a root
    /// accessor whose marker is a symbol character (`@age`).
    #[regex(r#"[^A-Za-z0-9_"$(),]"#, symbol_run)]
    Symbols(Run),
}

/// What a run of symbol characters turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Operators,
    RootAccessor,
}

/// Extends a quoted literal up to its closing quote.
fn quoted(lex: &mut Lexer<'_, Lexeme>) -> bool {
    match lex.remainder().find('"') {
        Some(end) => {
            lex.bump(end + 1);
            true
        },
        None => false,
    }
}

/// Extends a run of symbol characters; the root marker held in the extras
/// starts a root accessor instead when a name follows it.
fn symbol_run(lex: &mut Lexer<'_, Lexeme>) -> Run {
    let marker = lex.extras;
    let remainder = lex.remainder();

    if lex.slice().starts_with(marker) && remainder.starts_with(is_name_start) {
        let len = remainder.find(|c: char| !is_word_char(c))
                           .unwrap_or(remainder.len());
        lex.bump(len);
        return Run::RootAccessor;
    }

    let len = remainder.char_indices()
                       .find(|&(i, c)| !is_symbol_char(c) || starts_root_accessor(&remainder[i..], marker))
                       .map_or(remainder.len(), |(i, _)| i);
    lex.bump(len);
    Run::Operators
}

fn starts_root_accessor(text: &str, marker: char) -> bool {
    let mut chars = text.chars();
    chars.next() == Some(marker) && chars.next().is_some_and(is_name_start)
}

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// What a token means to the shunting-yard stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `,`
    Comma,
    /// A registered operator spelling.
    Operator,
    /// An operand: a name, a number, a quoted literal or a root accessor.
    Unit,
}

/// A token borrowed from the normalized input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Token<'s> {
    /// The token text.
    pub text:   &'s str,
    /// Byte offset in the normalized input.
    pub offset: usize,
    pub kind:   TokenKind,
}

/// Removes all whitespace, including whitespace inside quoted literals.
///
/// ```
/// use sift::interpreter::lexer::normalize;
///
/// assert_eq!(normalize(" $age >= 25\t&&\n$name == \"Bob Smith\""),
///            "$age>=25&&$name==\"BobSmith\"");
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Splits normalized input into tokens, lazily.
///
/// Symbolic operators are matched greedily, longest spelling first; words are
/// operators only if registered as such. A `-` directly followed by a number
/// is folded into the number when it stands where an operand is expected.
///
/// ```
/// use sift::interpreter::{
///     lexer::{TokenKind, tokenize},
///     table::OperatorTable,
/// };
///
/// let table = OperatorTable::standard();
/// let tokens = tokenize("$age>=-5&&!$active", &table).collect::<Result<Vec<_>, _>>()
///                                                     .unwrap();
/// let texts = tokens.iter().map(|t| t.text).collect::<Vec<_>>();
///
/// assert_eq!(texts, ["$age", ">=", "-5", "&&", "!", "$active"]);
/// assert_eq!(tokens[2].kind, TokenKind::Unit);
/// ```
#[must_use]
pub fn tokenize<'s, 't>(source: &'s str, table: &'t OperatorTable) -> Tokens<'s, 't> {
    tokenize_with_marker(source, table, '$')
}

/// Like [`tokenize`], with a root marker other than `$`.
///
/// A marker that is a symbol character is never part of an operator when a
/// name follows it.
///
/// ```
/// use sift::interpreter::{lexer::tokenize_with_marker, table::OperatorTable};
///
/// let table = OperatorTable::standard();
/// let texts = tokenize_with_marker("@age>=@level", &table, '@').map(|t| t.unwrap().text)
///                                                              .collect::<Vec<_>>();
/// assert_eq!(texts, ["@age", ">=", "@level"]);
/// ```
#[must_use]
pub fn tokenize_with_marker<'s, 't>(source: &'s str,
                                    table: &'t OperatorTable,
                                    root_marker: char)
                                    -> Tokens<'s, 't> {
    Tokens { lexer: Lexeme::lexer_with_extras(source, root_marker),
             table,
             pending: VecDeque::new(),
             previous: None,
             failed: false }
}

/// Iterator over the tokens of an input; see [`tokenize`].
pub struct Tokens<'s, 't> {
    lexer:    Lexer<'s, Lexeme>,
    table:    &'t OperatorTable,
    /// Pieces of a split symbol run that have not been yielded yet.
    pending:  VecDeque<Token<'s>>,
    previous: Option<TokenKind>,
    failed:   bool,
}

impl<'s> Tokens<'s, '_> {
    fn emit(&mut self, token: Token<'s>) -> Token<'s> {
        self.previous = Some(token.kind);
        token
    }

    /// Splits a run of symbol characters into operator spellings.
    ///
    /// Characters that start no spelling are grouped into a single unit, which
    /// the later stages reject with a positioned error.
    fn split_symbols(&mut self, run: &'s str, offset: usize) {
        let table = self.table;
        let mut before = self.previous;
        let mut unknown: Option<usize> = None;
        let mut i = 0;

        while i < run.len() {
            let rest = &run[i..];
            let Some(spelling) = table.symbolic_spellings()
                                      .iter()
                                      .find(|s| rest.starts_with(s.as_str()))
            else {
                unknown.get_or_insert(i);
                i += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            };

            if let Some(start) = unknown.take() {
                self.pending.push_back(Token { text:   &run[start..i],
                                               offset: offset + start,
                                               kind:   TokenKind::Unit, });
                before = Some(TokenKind::Unit);
            }

            let end = i + spelling.len();
            let token = if spelling.as_str() == "-" && end == run.len() && expects_operand(before) {
                self.negative_number(offset + i)
            } else {
                None
            };
            let token = token.unwrap_or(Token { text:   &run[i..end],
                                                offset: offset + i,
                                                kind:   TokenKind::Operator, });
            before = Some(token.kind);
            self.pending.push_back(token);
            i = end;
        }

        if let Some(start) = unknown {
            self.pending.push_back(Token { text:   &run[start..],
                                           offset: offset + start,
                                           kind:   TokenKind::Unit, });
        }
    }

    /// Folds the `-` at `offset` into the number that follows it, if any.
    fn negative_number(&mut self, offset: usize) -> Option<Token<'s>> {
        if !self.lexer.remainder().starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let source = self.lexer.source();
        match self.lexer.next() {
            Some(Ok(Lexeme::Number)) => Some(Token { text: &source[offset..self.lexer.span().end],
                                                     offset,
                                                     kind: TokenKind::Unit }),
            _ => None,
        }
    }

    fn error(&self, offset: usize, text: &str) -> CompileError {
        let message = if text.starts_with('"') {
            "unterminated quoted literal".to_string()
        } else {
            format!("unexpected character '{text}'")
        };
        CompileError::Tokenization { offset, message }
    }
}

/// Whether the next token stands where an operand is expected.
const fn expects_operand(previous: Option<TokenKind>) -> bool {
    matches!(previous,
             None | Some(TokenKind::Operator | TokenKind::OpenParen | TokenKind::Comma))
}

impl<'s> Iterator for Tokens<'s, '_> {
    type Item = CompileResult<Token<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(Ok(self.emit(token)));
        }
        if self.failed {
            return None;
        }

        let lexeme = self.lexer.next()?;
        let text = self.lexer.slice();
        let offset = self.lexer.span().start;

        let kind = match lexeme {
            Err(()) => {
                self.failed = true;
                return Some(Err(self.error(offset, text)));
            },
            Ok(Lexeme::Symbols(Run::Operators)) => {
                self.split_symbols(text, offset);
                return self.next();
            },
            Ok(Lexeme::Symbols(Run::RootAccessor)) => TokenKind::Unit,
            Ok(Lexeme::OpenParen) => TokenKind::OpenParen,
            Ok(Lexeme::CloseParen) => TokenKind::CloseParen,
            Ok(Lexeme::Comma) => TokenKind::Comma,
            Ok(Lexeme::Word) if self.table.contains(text) => TokenKind::Operator,
            Ok(Lexeme::Quoted | Lexeme::Number | Lexeme::Word) => TokenKind::Unit,
        };
        Some(Ok(self.emit(Token { text, offset, kind })))
    }
}
