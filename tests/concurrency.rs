mod common;

use std::{sync::Arc, thread};

use common::Fixture;
use sift::{
    Compiled, CompiledExpression, Predicate,
    interpreter::{table::OperatorTable, value::record::DynamicRecord},
    services::Schema,
};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn artifacts_are_send_and_sync() {
    assert_send_sync::<OperatorTable>();
    assert_send_sync::<Schema>();
    assert_send_sync::<CompiledExpression>();
    assert_send_sync::<Predicate>();
    assert_send_sync::<Compiled<i64>>();
    assert_send_sync::<DynamicRecord>();
}

#[test]
fn one_predicate_many_threads() {
    let fixture = Fixture::load();
    let predicate = Arc::new(fixture.predicate("guild?:rank >= 1 && $active").unwrap());
    let players = Arc::new(fixture.players.clone());

    let handles = (0..8).map(|i| {
                            let predicate = Arc::clone(&predicate);
                            let players = Arc::clone(&players);
                            thread::spawn(move || {
                                let player = &players[i % players.len()];
                                (0..100).map(|_| predicate.test(player).unwrap())
                                        .collect::<Vec<_>>()
                            })
                        })
                        .collect::<Vec<_>>();

    for (i, handle) in handles.into_iter().enumerate() {
        let results = handle.join().unwrap();
        let expected = i % 3 != 1;
        assert!(results.iter().all(|&r| r == expected), "thread {i}");
    }
}
