//! Decoding JSON documents straight into a store.

use crate::codec::decode;
use crate::query::{Predicate, query};
use crate::simulation::check_index_agreement;
use crate::testing::{init_tracing, link, store, store_with, triple, triples};
use crate::types::Value;

const PEOPLE: &str = r#"[
    {
        "@id": "u:A",
        "name": "Ann",
        "age": 31,
        "follows": [{"@id": "u:B", "status": "b"}, {"id": "s:C"}]
    },
    {
        "@id": "s:C",
        "follows": {"@id": "u:B"},
        "score": 0.5,
        "verified": true,
        "nickname": null
    },
    {"status": "anonymous"}
]"#;

#[test]
fn test_decoded_document_is_queryable() {
    init_tracing();
    let bag = decode(PEOPLE).expect("decode");
    let store = store_with(40, bag);
    assert_eq!(check_index_agreement(&store), Ok(()));

    let follows = query(None, Some(Predicate::eq("follows")), None);
    assert_eq!(
        triples(store.match_pattern(&follows)),
        vec![
            link("s:C", "follows", "u:B"),
            link("u:A", "follows", "s:C"),
            link("u:A", "follows", "u:B"),
        ]
    );

    let about_a = query(Some(Predicate::eq("u:A")), Some(Predicate::prefix("a")), None);
    assert_eq!(
        triples(store.match_pattern(&about_a)),
        vec![triple("u:A", "age", 31_i64)]
    );
}

#[test]
fn test_literal_categories_survive_decoding() {
    let store = store_with(41, decode(PEOPLE).expect("decode"));
    let about_c = query(Some(Predicate::eq("s:C")), None, None);

    let objects: Vec<Value> = triples(store.match_pattern(&about_c))
        .into_iter()
        .map(|(_, _, o)| o)
        .collect();
    assert_eq!(
        objects,
        vec![Value::iri("u:B"), Value::Double(0.5), Value::Boolean(true)]
    );
}

#[test]
fn test_anonymous_entities_get_blank_subjects() {
    let store = store_with(42, decode(PEOPLE).expect("decode"));
    let blank = query(Some(Predicate::prefix("_:")), None, None);

    let found = triples(store.match_pattern(&blank));
    assert_eq!(found.len(), 1);
    let (s, p, o) = &found[0];
    assert!(s.is_blank(), "{s}");
    assert_eq!((p.as_str(), o), ("status", &Value::string("anonymous")));
}

#[test]
fn test_anonymous_entities_from_separate_documents_stay_apart() {
    let mut store = store(43);
    store
        .add(decode(r#"{"name": "alice"}"#).expect("decode"))
        .expect("add");
    store
        .add(decode(r#"{"name": "bob"}"#).expect("decode"))
        .expect("add");

    let names = query(None, Some(Predicate::eq("name")), None);
    let found = triples(store.match_pattern(&names));
    assert_eq!(found.len(), 2);
    assert_ne!(found[0].0, found[1].0, "two anonymous entities merged");
    assert!(found.iter().all(|(s, _, _)| s.is_blank()));

    for (s, _, _) in &found {
        let about = query(Some(Predicate::eq(s.clone())), None, None);
        assert_eq!(store.match_pattern(&about).count(), 1);
    }
}
