mod common;

use common::Fixture;
use sift::{
    CompileError,
    error::Grouping,
    interpreter::{
        lexer::{TokenKind, normalize, tokenize},
        parser::shunting_yard::to_postfix,
        table::OperatorTable,
    },
};

fn texts(source: &str) -> Vec<String> {
    let table = OperatorTable::standard();
    let normalized = normalize(source);
    tokenize(&normalized, &table).map(|t| t.map(|t| t.text.to_string()))
                                 .collect::<Result<_, _>>()
                                 .unwrap_or_else(|e| panic!("`{source}` failed to tokenize: {e}"))
}

fn postfix(source: &str) -> Vec<String> {
    let fixture = Fixture::load();
    fixture.compiler()
           .postfix(source)
           .unwrap_or_else(|e| panic!("`{source}` failed to reorder: {e}"))
}

#[test]
fn tokens_rejoin_to_normalized_input() {
    for source in ["2 + 5 * 3",
                   "\"fdd3we43dsx\" + a5",
                   "6 *(55+ !6)*3",
                   "6 *!(55+ -6) * 3",
                   "$guild ?: name == \"Knights\" && age:25",
                   "a&&&b",
                   "len($name) >= -1.5"]
    {
        assert_eq!(texts(source).concat(), normalize(source), "{source}");
    }
}

#[test]
fn tokenizer_splits_operators() {
    assert_eq!(texts("2 + 5 * 3"), ["2", "+", "5", "*", "3"]);
    assert_eq!(texts("\"fdd3we43dsx\" + a5"), ["\"fdd3we43dsx\"", "+", "a5"]);
    assert_eq!(texts("6 *(55+ !6)*3"), ["6", "*", "(", "55", "+", "!", "6", ")", "*", "3"]);
    assert_eq!(texts("a&&&b"), ["a", "&&", "&", "b"]);
    assert_eq!(texts("$guild?:name"), ["$guild", "?:", "name"]);
}

#[test]
fn minus_folds_into_numbers_in_prefix_position() {
    assert_eq!(texts("6 *!(55+ -6) * 3"),
               ["6", "*", "!", "(", "55", "+", "-6", ")", "*", "3"]);
    assert_eq!(texts("-2.5"), ["-2.5"]);
    assert_eq!(texts("age:-5"), ["age", ":", "-5"]);
    assert_eq!(texts("f(1,-2)"), ["f", "(", "1", ",", "-2", ")"]);
    assert_eq!(texts("8-3"), ["8", "-", "3"]);
    assert_eq!(texts("$a - -3"), ["$a", "-", "-3"]);
}

#[test]
fn token_kinds() {
    let table = OperatorTable::standard();
    let fixture = Fixture::load();
    let kinds = |source: &str, table: &OperatorTable| {
        tokenize(source, table).map(|t| t.unwrap().kind).collect::<Vec<_>>()
    };

    assert_eq!(kinds("len($name)", &table),
               [TokenKind::Unit, TokenKind::OpenParen, TokenKind::Unit, TokenKind::CloseParen]);
    assert_eq!(kinds("len($name)", &fixture.table),
               [TokenKind::Operator,
                TokenKind::OpenParen,
                TokenKind::Unit,
                TokenKind::CloseParen]);
    assert_eq!(kinds("a#b", &table), [TokenKind::Unit, TokenKind::Unit, TokenKind::Unit]);
}

#[test]
fn tokenizer_errors() {
    let table = OperatorTable::standard();
    let first_error = |source: &str| tokenize(source, &table).find_map(Result::err);

    assert_eq!(first_error("$name==\"Bob"),
               Some(CompileError::Tokenization { offset:  7,
                                                 message: "unterminated quoted literal".into(), }));
    assert!(matches!(first_error("$"), Some(CompileError::Tokenization { offset: 0, .. })));
    assert_eq!(first_error("$name==\"Bob\""), None);
}

#[test]
fn postfix_follows_precedence_and_associativity() {
    assert_eq!(postfix("2+3*4"), ["2", "3", "4", "*", "+"]);
    assert_eq!(postfix("8-3-2"), ["8", "3", "-", "2", "-"]);
    assert_eq!(postfix("!!$active"), ["$active", "!", "!"]);
    assert_eq!(postfix("!$a==b"), ["$a", "!", "b", "=="]);
    assert_eq!(postfix("a||b&&c"), ["a", "b", "c", "&&", "||"]);
    assert_eq!(postfix("a.b.c"), ["a", "b", ".", "c", "."]);
    assert_eq!(postfix("max(1,2*3)"), ["1", "2", "3", "*", "max"]);
    assert_eq!(postfix("starts_with(lower($name),\"e\")"),
               ["$name", "lower", "\"e\"", "starts_with"]);
}

#[test]
fn redundant_parentheses_do_not_change_postfix() {
    assert_eq!(postfix("(2+(3*4))"), postfix("2+3*4"));
    assert_eq!(postfix("((8-3)-2)"), postfix("8-3-2"));
    assert_eq!(postfix("((age)):((25))"), postfix("age:25"));
}

#[test]
fn unbalanced_parentheses() {
    let table = OperatorTable::standard();
    let reorder = |source: &'static str| to_postfix(tokenize(source, &table), &table);

    assert_eq!(reorder("(a+b"),
               Err(CompileError::UnbalancedParentheses { offset:   0,
                                                         grouping: Grouping::Parentheses, }));
    assert_eq!(reorder("a+b)"),
               Err(CompileError::UnbalancedParentheses { offset:   3,
                                                         grouping: Grouping::Parentheses, }));
    assert_eq!(reorder("(a,b)"),
               Err(CompileError::UnbalancedParentheses { offset:   2,
                                                         grouping: Grouping::CallArguments, }));
}

#[test]
fn compiled_trees_print_their_grouping() {
    let fixture = Fixture::load();
    let print = |source: &str| fixture.compiler().compile(source).unwrap().to_string();

    assert_eq!(print("$age + $level * $bonus"), "($age + ($level * $bonus))");
    assert_eq!(print("age:25"), "($age == 25)");
    assert_eq!(print("guild?:name == \"Knights\""), "($guild?:name == \"Knights\")");
    assert_eq!(print("!$active || len($name) > 3"), "(!$active || (len($name) > 3))");
}
