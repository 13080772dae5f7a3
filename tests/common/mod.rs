#![allow(dead_code)]

use std::fs;

use sift::{
    CompileResult, Compiler, Predicate,
    interpreter::{
        evaluator::function::core::standard,
        table::OperatorTable,
        value::{record::DynamicRecord, types::ValueType},
    },
    services::Schema,
};

/// The schema in `tests/cases/schema.json` and the players Bob, Alice and Eve.
pub struct Fixture {
    pub schema:  Schema,
    pub table:   OperatorTable,
    pub root:    ValueType,
    pub players: Vec<DynamicRecord>,
}

impl Fixture {
    pub fn load() -> Self {
        let schema = Schema::from_json(&read("tests/cases/schema.json")).expect("valid schema");
        let root = schema.root_type().expect("root type");
        let table = OperatorTable::standard().with_functions(standard())
                                             .expect("standard functions register");
        let players: serde_json::Value =
            serde_json::from_str(&read("tests/cases/players.json")).expect("valid players");
        let players = players.as_array()
                             .expect("an array of players")
                             .iter()
                             .map(|p| schema.record_from_json("Player", p).expect("valid player"))
                             .collect();

        Self { schema,
               table,
               root,
               players }
    }

    pub fn compiler(&self) -> Compiler<'_> {
        Compiler::new(&self.table, &self.schema, &self.schema, &self.root)
    }

    pub fn predicate(&self, text: &str) -> CompileResult<Predicate> {
        self.compiler().compile_predicate(text)
    }

    pub fn player(&self, name: &str) -> &DynamicRecord {
        let index = match name {
            "Bob" => 0,
            "Alice" => 1,
            "Eve" => 2,
            other => panic!("no player named {other}"),
        };
        &self.players[index]
    }

    /// Compiles `text` and evaluates it for every player.
    ///
    /// Renders `compile error Kind`, or one outcome per player: the value, or
    /// `error Kind`.
    pub fn outcomes(&self, text: &str) -> String {
        match self.compiler().compile(text) {
            Err(e) => format!("compile error {}", variant(&e)),
            Ok(compiled) => self.players
                                .iter()
                                .map(|player| match compiled.evaluate(player) {
                                    Ok(value) => value.to_string(),
                                    Err(e) => format!("error {}", variant(&e)),
                                })
                                .collect::<Vec<_>>()
                                .join(", "),
        }
    }
}

/// The variant name of an error enum, e.g. `UnknownMember`.
pub fn variant(error: &impl std::fmt::Debug) -> String {
    format!("{error:?}").chars().take_while(char::is_ascii_alphanumeric).collect()
}

fn read(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}
