mod common;

use std::fs;

use common::Fixture;
use walkdir::WalkDir;

#[test]
fn case_files_pass() {
    let fixture = Fixture::load();
    let mut count = 0;

    for entry in
        WalkDir::new("tests/cases").into_iter()
                                   .filter_map(Result::ok)
                                   .filter(|e| e.path().extension().is_some_and(|ext| ext == "case"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((expression, expected)) = line.rsplit_once(" => ") else {
                panic!("{path:?}:{} has no ' => ' separator", i + 1);
            };

            count += 1;
            assert_eq!(fixture.outcomes(expression),
                       expected.trim(),
                       "case {:?}:{} `{}`",
                       path,
                       i + 1,
                       expression);
        }
    }

    assert!(count > 0, "No cases found in tests/cases");
}

fn assert_holds(fixture: &Fixture, src: &str, player: &str) {
    let predicate = fixture.predicate(src)
                           .unwrap_or_else(|e| panic!("`{src}` failed to compile: {e}"));
    match predicate.test(fixture.player(player)) {
        Ok(true) => {},
        Ok(false) => panic!("`{src}` does not hold for {player}"),
        Err(e) => panic!("`{src}` failed for {player}: {e}"),
    }
}

fn assert_fails(fixture: &Fixture, src: &str) {
    if fixture.predicate(src).is_ok() {
        panic!("`{src}` compiled but was expected to fail")
    }
}

#[test]
fn member_match_is_equality() {
    let fixture = Fixture::load();
    for player in &fixture.players {
        let by_match = fixture.predicate("age:25").unwrap().test(player).unwrap();
        let by_equality = fixture.predicate("$age == 25").unwrap().test(player).unwrap();
        assert_eq!(by_match, by_equality);
    }
    assert_holds(&fixture, "age:25", "Bob");
}

#[test]
fn integer_member_never_matches_null() {
    let fixture = Fixture::load();
    let predicate = fixture.predicate("age:null").unwrap();
    assert!(fixture.players.iter().all(|p| !predicate.test(p).unwrap()));
}

#[test]
fn whitespace_is_insignificant() {
    let fixture = Fixture::load();
    assert_holds(&fixture, "  $age\t>=\n18 &&   guild ?: name == \"Knights\"", "Bob");
    assert_holds(&fixture, "name:\"Al ice\"", "Alice");
}

#[test]
fn precedence_groups_like_arithmetic() {
    let fixture = Fixture::load();
    assert_holds(&fixture, "$age + $level * $bonus == 75", "Bob");
    assert_holds(&fixture, "($age + $level) * $bonus == 175", "Bob");
    assert_holds(&fixture, "$age - $level - $bonus == 10", "Bob");
    assert_holds(&fixture, "$age - ($level - $bonus) == 20", "Bob");
}

#[test]
fn null_safe_chains() {
    let fixture = Fixture::load();
    assert_holds(&fixture, "guild?:name == null", "Alice");
    assert_holds(&fixture, "$guild?:leader?:name == null", "Bob");
    assert_holds(&fixture, "!(guild?:rank >= 0)", "Alice");
}

#[test]
fn predicates_require_bool() {
    let fixture = Fixture::load();
    assert_fails(&fixture, "$age + $level");
    assert_fails(&fixture, "$name");
    assert_fails(&fixture, "len($name)");
}
