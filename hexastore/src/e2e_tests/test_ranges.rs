//! Prefix containment, range closure and category-bounded comparisons.

use crate::query::{Predicate, query};
use crate::simulation::SimulatedTimeSource;
use crate::storage::Store;
use crate::testing::{init_tracing, store_with, triples};
use crate::types::{Iri, Statement, Value};

fn subjects() -> Store<SimulatedTimeSource> {
    init_tracing();
    store_with(
        8,
        ["u:a", "u:aa", "u:ab", "u:abc", "u:b", "u:ba", "v:a"]
            .into_iter()
            .map(|s| Statement::new(s, "status", "x"))
            .collect(),
    )
}

fn objects() -> Store<SimulatedTimeSource> {
    init_tracing();
    let objects = [
        Value::Boolean(false),
        Value::Boolean(true),
        Value::Integer(-3),
        Value::Integer(7),
        Value::Integer(12),
        Value::Integer(120),
        Value::Double(0.5),
        Value::Double(2.5),
        Value::string("a"),
        Value::string("b"),
        Value::string("ba"),
        Value::string("c"),
        Value::iri("s:C"),
        Value::iri("u:B"),
    ];
    store_with(
        9,
        objects
            .into_iter()
            .map(|o| Statement::new("u:X", "has", o))
            .collect(),
    )
}

fn matched_subjects(store: &Store<SimulatedTimeSource>, s: Predicate<Iri>) -> Vec<String> {
    store
        .match_pattern(&query(Some(s), None, None))
        .map(|st| st.s.to_string())
        .collect()
}

fn matched_objects(store: &Store<SimulatedTimeSource>, o: Predicate<Value>) -> Vec<Value> {
    triples(store.match_pattern(&query(None, None, Some(o))))
        .into_iter()
        .map(|(_, _, o)| o)
        .collect()
}

#[test]
fn test_prefix_contains_exactly_its_run() {
    let store = subjects();
    assert_eq!(
        matched_subjects(&store, Predicate::prefix("u:a")),
        vec!["u:a", "u:aa", "u:ab", "u:abc"]
    );
    assert_eq!(
        matched_subjects(&store, Predicate::prefix("u:ab")),
        vec!["u:ab", "u:abc"]
    );
    assert_eq!(
        matched_subjects(&store, Predicate::prefix("u:b")),
        vec!["u:b", "u:ba"]
    );
    assert!(matched_subjects(&store, Predicate::prefix("u:c")).is_empty());
    assert!(matched_subjects(&store, Predicate::prefix("w")).is_empty());
}

#[test]
fn test_in_is_closed_and_bounds_are_strict() {
    let store = subjects();
    assert_eq!(
        matched_subjects(&store, Predicate::in_range("u:aa", "u:abc")),
        vec!["u:aa", "u:ab", "u:abc"]
    );
    assert_eq!(
        matched_subjects(&store, Predicate::lt("u:ab")),
        vec!["u:a", "u:aa"]
    );
    assert_eq!(
        matched_subjects(&store, Predicate::gt("u:ba")),
        vec!["v:a"]
    );
    assert!(matched_subjects(&store, Predicate::in_range("u:c", "u:z")).is_empty());
}

#[test]
fn test_object_bounds_stay_in_category() {
    let store = objects();

    assert_eq!(
        matched_objects(&store, Predicate::gt("a")),
        vec![Value::string("b"), Value::string("ba"), Value::string("c")]
    );
    assert_eq!(
        matched_objects(&store, Predicate::lt("b")),
        vec![Value::string("a")]
    );
    assert_eq!(
        matched_objects(&store, Predicate::gt(7_i64)),
        vec![Value::Integer(12), Value::Integer(120)]
    );
    assert_eq!(
        matched_objects(&store, Predicate::lt(Value::iri("u:B"))),
        vec![Value::iri("s:C")]
    );
    assert_eq!(
        matched_objects(&store, Predicate::lt(true)),
        vec![Value::Boolean(false)]
    );
}

#[test]
fn test_object_range_is_closed() {
    let store = objects();
    assert_eq!(
        matched_objects(&store, Predicate::in_range(7_i64, 120_i64)),
        vec![Value::Integer(7), Value::Integer(12), Value::Integer(120)]
    );
    assert_eq!(
        matched_objects(&store, Predicate::in_range(0.5, 2.5)),
        vec![Value::Double(0.5), Value::Double(2.5)]
    );
}

#[test]
fn test_textual_object_prefix() {
    let store = objects();
    assert_eq!(
        matched_objects(&store, Predicate::prefix("b")),
        vec![Value::string("b"), Value::string("ba")]
    );
    assert_eq!(
        matched_objects(&store, Predicate::prefix(Value::iri("u:"))),
        vec![Value::iri("u:B")]
    );
}

#[test]
fn test_numeric_prefix_uses_lexical_form() {
    let store = objects();
    assert_eq!(
        matched_objects(&store, Predicate::prefix(12_i64)),
        vec![Value::Integer(12), Value::Integer(120)]
    );
    assert!(matched_objects(&store, Predicate::prefix(9_i64)).is_empty());
}

#[test]
fn test_bounds_under_an_anchor() {
    let store = objects();
    let pattern = query(
        Some(Predicate::eq("u:X")),
        Some(Predicate::eq("has")),
        Some(Predicate::gt(0.5)),
    );
    assert_eq!(pattern.to_string(), "(sp)º ⇒ ∅");
    assert_eq!(
        triples(store.match_pattern(&pattern))
            .into_iter()
            .map(|(_, _, o)| o)
            .collect::<Vec<_>>(),
        vec![Value::Double(2.5)]
    );
}
