mod common;

use common::Fixture;
use sift::{
    CompileError, Compiler, CompilerOptions, EvalError,
    ast::{BinaryOperator, ComparisonOperator, Expr},
    interpreter::{
        evaluator::function::core::{Function, standard},
        parser::tree::{StackNode, Typed},
        table::{Arity, Associativity, Builder, Operator, OperatorTable},
        value::{
            core::Value,
            record::{DynamicRecord, Record},
            types::ValueType,
        },
    },
    services::{RecordSchema, Schema, StandardConverter, TypeIntrospection},
};

/// A hand-written record whose property and field named `id` differ.
#[derive(Debug)]
struct Ticket {
    id:       i64,
    raw_id:   i64,
    assignee: Option<String>,
}

impl Record for Ticket {
    fn type_name(&self) -> &str {
        "Ticket"
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Integer(self.id)),
            "assignee" => Some(self.assignee.clone().into()),
            _ => None,
        }
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" | "raw" => Some(Value::Integer(self.raw_id)),
            _ => None,
        }
    }
}

struct TicketTypes;

impl TypeIntrospection for TicketTypes {
    fn property_type(&self, _owner: &ValueType, name: &str) -> Option<ValueType> {
        match name {
            "id" => Some(ValueType::Integer),
            "assignee" => Some(ValueType::Text.nullable()),
            "closed" => Some(ValueType::Bool.nullable()),
            _ => None,
        }
    }

    fn field_type(&self, _owner: &ValueType, name: &str) -> Option<ValueType> {
        match name {
            "id" | "raw" => Some(ValueType::Integer),
            _ => None,
        }
    }
}

fn ticket() -> Ticket {
    Ticket { id:       7,
             raw_id:   700,
             assignee: None, }
}

#[test]
fn properties_win_over_fields() {
    let table = OperatorTable::standard();
    let converter = StandardConverter::new();
    let root = ValueType::Record("Ticket".into());
    let compiler = Compiler::new(&table, &TicketTypes, &converter, &root);

    assert!(compiler.compile_predicate("id:7").unwrap().test(&ticket()).unwrap());
    assert!(compiler.compile_predicate("raw:700").unwrap().test(&ticket()).unwrap());
    assert!(compiler.compile_predicate("assignee:null").unwrap().test(&ticket()).unwrap());
}

#[test]
fn missing_members_fail_at_runtime() {
    let table = OperatorTable::standard();
    let converter = StandardConverter::new();
    let root = ValueType::Record("Ticket".into());
    let compiler = Compiler::new(&table, &TicketTypes, &converter, &root);

    let closed = compiler.compile_predicate("closed:true").unwrap();
    assert_eq!(closed.test(&ticket()),
               Err(EvalError::MissingMember { type_name: "Ticket".into(),
                                              member:    "closed".into(), }));
}

#[test]
fn nullable_predicates_treat_null_as_false() {
    let schema = Schema::new().with_record("Task",
                                           RecordSchema::new().property("done", ValueType::Bool.nullable()));
    let table = OperatorTable::standard();
    let root = ValueType::Record("Task".into());
    let compiler = Compiler::new(&table, &schema, &schema, &root);

    let done = compiler.compile_predicate("$done").unwrap();
    assert_eq!(done.expression().result_type(), &ValueType::Bool.nullable());
    assert!(!done.test(&DynamicRecord::new("Task").with_property("done", Value::Null)).unwrap());
    assert!(done.test(&DynamicRecord::new("Task").with_property("done", true)).unwrap());
}

#[test]
fn typed_results() {
    let fixture = Fixture::load();
    let compiler = fixture.compiler();
    let bob = fixture.player("Bob");
    let alice = fixture.player("Alice");

    let age = compiler.compile_as::<i64>("$age").unwrap();
    assert_eq!(age.evaluate(bob).unwrap(), 25);

    let bonus = compiler.compile_as::<Option<i64>>("$bonus").unwrap();
    assert_eq!(bonus.evaluate(bob).unwrap(), Some(5));
    assert_eq!(bonus.evaluate(alice).unwrap(), None);

    let class = compiler.compile_as::<String>("$class").unwrap();
    assert_eq!(class.evaluate(alice).unwrap(), "Mage");

    let score = compiler.compile_as::<f64>("$age").unwrap();
    assert!((score.evaluate(bob).unwrap() - 25.0).abs() < f64::EPSILON);

    let guild = compiler.compile_as::<Option<String>>("$guild?:name").unwrap();
    assert_eq!(guild.evaluate(alice).unwrap(), None);

    assert_eq!(compiler.compile_as::<i64>("$bonus").unwrap_err(),
               CompileError::ResultTypeMismatch { expected: "integer".into(),
                                                  found:    "integer?".into(), });
    assert!(matches!(compiler.compile_as::<bool>("$name"),
                     Err(CompileError::ResultTypeMismatch { .. })));
}

#[test]
fn compiling_twice_is_deterministic() {
    let fixture = Fixture::load();
    let compiler = fixture.compiler();
    let source = "guild?:rank >= 1 && (class:mage || len($name) > 3)";

    let first = compiler.compile(source).unwrap();
    let second = compiler.compile(source).unwrap();
    assert_eq!(first, second);
    for player in &fixture.players {
        assert_eq!(first.evaluate(player), second.evaluate(player));
    }
}

#[test]
fn options_change_how_text_is_read() {
    let fixture = Fixture::load();
    let bob = fixture.player("Bob");

    let options = CompilerOptions { root_marker:   '@',
                                    implicit_root: false,
                                    null_literal:  "nil".into(), };
    let compiler = fixture.compiler().with_options(&options);

    assert!(compiler.compile_predicate("@age:25").unwrap().test(bob).unwrap());
    assert!(compiler.compile_predicate("@nickname != nil").unwrap().test(bob).unwrap());
    assert!(matches!(compiler.compile_predicate("age:25"),
                     Err(CompileError::TypeResolution { .. })));
    assert!(compiler.compile_predicate("@nickname != null").unwrap().test(bob).unwrap());
    assert!(compiler.compile_predicate("@age>=18&&@guild?:rank>1").unwrap().test(bob).unwrap());
}

#[test]
fn literal_conversion_errors_name_the_target() {
    let fixture = Fixture::load();
    let error = fixture.predicate("age:abc").unwrap_err();
    assert!(matches!(&error,
                     CompileError::LiteralConversion { text, target, .. }
                     if text == "abc" && target == "integer"));
}

#[test]
fn unknown_members_name_the_member() {
    let fixture = Fixture::load();
    assert_eq!(fixture.predicate("missingField:1").unwrap_err(),
               CompileError::UnknownMember { type_name: "Player".into(),
                                             member:    "missingField".into(), });
}

#[test]
fn both_literals_are_ambiguous() {
    let fixture = Fixture::load();
    assert_eq!(fixture.predicate("5==10").unwrap_err(),
               CompileError::AmbiguousLiteralType { operator: "==".into(),
                                                    offset:   1,
                                                    left:     "5".into(),
                                                    right:    "10".into(), });
}

#[test]
fn integer_overflow_is_reported() {
    let schema = Schema::new().with_record("Pair",
                                           RecordSchema::new().property("a", ValueType::Integer)
                                                              .property("b", ValueType::Integer));
    let table = OperatorTable::standard();
    let root = ValueType::Record("Pair".into());
    let compiler = Compiler::new(&table, &schema, &schema, &root);
    let sum = compiler.compile("$a * $b").unwrap();

    let pair = DynamicRecord::new("Pair").with_property("a", i64::MAX)
                                         .with_property("b", 2_i64);
    assert_eq!(sum.evaluate(&pair), Err(EvalError::Overflow));
}

#[test]
fn custom_word_operators() {
    let fixture = Fixture::load();
    let mut table = fixture.table.clone();
    table.register(Operator::binary("and", 2, Builder::Logical(BinaryOperator::AndAlso)))
         .unwrap();
    table.register(Operator::new("not", 3, Associativity::Right, Arity::Unary, Builder::Not))
         .unwrap();
    let compiler = Compiler::new(&table, &fixture.schema, &fixture.schema, &fixture.root);

    let adult = compiler.compile_predicate("$active and not age < 18").unwrap();
    assert!(adult.test(fixture.player("Bob")).unwrap());
    assert!(!adult.test(fixture.player("Eve")).unwrap());

    let negated = compiler.compile_predicate("not $active == false").unwrap();
    assert!(negated.test(fixture.player("Bob")).unwrap());
    assert!(!negated.test(fixture.player("Alice")).unwrap());
}

#[test]
fn custom_builders() {
    let fixture = Fixture::load();
    let mut table = fixture.table.clone();
    table.register(Operator::binary("<>",
                                    5,
                                    Builder::custom(|stack, context, site| {
                                        let (left, right) = stack.pop_pair(site)?;
                                        let (left, right) = context.pair(left, right, site)?;
                                        let expr = Expr::Comparison { op:    ComparisonOperator::NotEqual,
                                                                      left:  Box::new(left.expr),
                                                                      right: Box::new(right.expr), };
                                        Ok(StackNode::Typed(Typed { expr,
                                                                    ty: ValueType::Bool }))
                                    })))
         .unwrap();
    let compiler = Compiler::new(&table, &fixture.schema, &fixture.schema, &fixture.root);

    let not_bob = compiler.compile_predicate("$name <> \"Bob\"").unwrap();
    assert!(!not_bob.test(fixture.player("Bob")).unwrap());
    assert!(not_bob.test(fixture.player("Eve")).unwrap());
    assert!(matches!(compiler.compile_predicate("1 <> 2"),
                     Err(CompileError::AmbiguousLiteralType { .. })));
}

#[test]
fn custom_functions() {
    fn clamp_age(args: &[Value]) -> sift::EvalResult<Value> {
        Ok(Value::Integer(args[0].as_integer()?.min(args[1].as_integer()?)))
    }

    let fixture = Fixture::load();
    let mut table = fixture.table.clone();
    table.register_function(Function::new("cap",
                                          vec![ValueType::Integer, ValueType::Integer],
                                          ValueType::Integer,
                                          clamp_age))
         .unwrap();
    let compiler = Compiler::new(&table, &fixture.schema, &fixture.schema, &fixture.root);

    let capped = compiler.compile_as::<i64>("cap($age, 20)").unwrap();
    assert_eq!(capped.evaluate(fixture.player("Bob")).unwrap(), 20);
    assert_eq!(capped.evaluate(fixture.player("Eve")).unwrap(), 17);
}

#[test]
fn table_registration_is_validated() {
    let mut table = OperatorTable::standard();

    assert_eq!(table.register(Operator::binary("+", 7, Builder::Arithmetic(BinaryOperator::Add))),
               Err(CompileError::DuplicateOperator { spelling: "+".into() }));
    assert!(matches!(table.register(Operator::binary("a+", 7, Builder::Arithmetic(BinaryOperator::Add))),
                     Err(CompileError::InvalidOperator { .. })));
    assert!(matches!(table.register(Operator::binary("", 7, Builder::Not)),
                     Err(CompileError::InvalidOperator { .. })));
    assert!(matches!(table.register(Operator::new("~",
                                                  10,
                                                  Associativity::Right,
                                                  Arity::Unary,
                                                  Builder::Arithmetic(BinaryOperator::Add))),
                     Err(CompileError::InvalidOperator { .. })));
    assert_eq!(table.get("**").unwrap_err(),
               CompileError::UnknownOperator { spelling: "**".into() });

    let mut spellings = table.spellings().collect::<Vec<_>>();
    spellings.sort_unstable();
    assert_eq!(spellings,
               ["!", "!=", "&", "&&", "*", "+", "-", ".", "/", ":", "<", "<=", "==", ">", ">=",
                "?:", "|", "||"]);

    let table = table.with_functions(standard()).unwrap();
    let mut words = table.spellings()
                         .filter(|s| s.starts_with(char::is_alphabetic))
                         .collect::<Vec<_>>();
    words.sort_unstable();
    assert_eq!(words, ["abs", "contains", "len", "lower", "max", "min", "starts_with"]);
}

#[test]
fn unregistered_function_calls_are_reported_by_name() {
    let fixture = Fixture::load();

    assert_eq!(fixture.predicate("shout($name)").unwrap_err(),
               CompileError::UnknownOperator { spelling: "shout".into() });
    assert_eq!(fixture.predicate("f()").unwrap_err(),
               CompileError::UnknownOperator { spelling: "f".into() });
}
