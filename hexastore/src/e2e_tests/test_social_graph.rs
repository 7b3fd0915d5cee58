//! Queries over the social graph fixture.

use crate::query::{Pattern, Predicate, Stream, query};
use crate::simulation::SimulatedTimeSource;
use crate::storage::Store;
use crate::testing::{
    A, B, C, D, E, F, G, N, init_tracing, link, social_graph, store_with, triple, triples,
};
use crate::types::{Graph, Value};

fn graph_store() -> Store<SimulatedTimeSource> {
    init_tracing();
    store_with(42, social_graph())
}

#[test]
fn test_everything_about_a_subject() {
    let store = graph_store();
    let pattern = query(Some(Predicate::eq(C)), None, None);

    assert_eq!(pattern.to_string(), "(s) ⇒ po");
    assert_eq!(
        triples(store.match_pattern(&pattern)),
        vec![
            link(C, "follows", B),
            link(C, "follows", E),
            link(C, "relates", D),
        ]
    );
}

#[test]
fn test_subject_and_predicate() {
    let store = graph_store();
    let pattern = query(Some(Predicate::eq(C)), Some(Predicate::eq("follows")), None);

    assert_eq!(pattern.to_string(), "(sp) ⇒ o");
    assert_eq!(
        triples(store.match_pattern(&pattern)),
        vec![link(C, "follows", B), link(C, "follows", E)]
    );
}

#[test]
fn test_predicate_prefix_under_subject() {
    let store = graph_store();
    let pattern = query(Some(Predicate::eq(C)), Some(Predicate::has_prefix("f")), None);

    assert_eq!(pattern.to_string(), "(sᴾ) ⇒ o");
    assert_eq!(
        triples(store.match_pattern(&pattern)),
        vec![link(C, "follows", B), link(C, "follows", E)]
    );
}

#[test]
fn test_status_literals_ordered_by_subject() {
    let store = graph_store();
    let pattern = query(None, Some(Predicate::eq("status")), None);

    assert_eq!(pattern.to_string(), "(p) ⇒ so");
    assert_eq!(
        triples(store.match_pattern(&pattern)),
        vec![
            triple(G, "status", "g"),
            triple(B, "status", "b"),
            triple(D, "status", "d"),
        ]
    );
}

#[test]
fn test_everything_pointing_at_an_object() {
    let store = graph_store();
    let pattern = query(None, None, Some(Predicate::eq(Value::iri(B))));

    assert_eq!(pattern.to_string(), "(o) ⇒ ps");
    assert_eq!(
        triples(store.match_pattern(&pattern)),
        vec![
            link(C, "follows", B),
            link(A, "follows", B),
            link(D, "relates", B),
        ]
    );
}

#[test]
fn test_predicate_match_orders_by_subject() {
    let store = graph_store();
    let pattern = query(None, Some(Predicate::eq("follows")), None);

    let subjects: Vec<String> = store
        .match_pattern(&pattern)
        .map(|st| st.s.to_string())
        .collect();
    assert_eq!(subjects, vec![C, C, F, A, B, E]);
}

#[test]
fn test_unknown_subject_is_empty_for_every_shape() {
    let store = graph_store();
    let patterns = [
        query(Some(Predicate::eq(N)), None, None),
        query(Some(Predicate::eq(N)), Some(Predicate::eq("follows")), None),
        query(Some(Predicate::eq(N)), None, Some(Predicate::eq(Value::iri(B)))),
        query(
            Some(Predicate::eq(N)),
            Some(Predicate::eq("follows")),
            Some(Predicate::eq(Value::iri(B))),
        ),
        query(Some(Predicate::eq(N)), Some(Predicate::prefix("f")), None),
        query(Some(Predicate::eq(N)), None, Some(Predicate::gt("a"))),
    ];

    for pattern in &patterns {
        assert_eq!(store.match_pattern(pattern).count(), 0, "{pattern}");
    }
}

#[test]
fn test_full_scan() {
    let store = graph_store();
    let pattern = Pattern::all();

    assert_eq!(pattern.to_string(), "∅ ⇒ spo");
    assert_eq!(store.match_pattern(&pattern).count(), social_graph().len());
}

#[test]
fn test_every_statement_round_trips() {
    let store = graph_store();

    for st in social_graph() {
        let (s, p, o) = st.triple();
        let pattern = query(
            Some(Predicate::eq(s.clone())),
            Some(Predicate::eq(p.clone())),
            Some(Predicate::eq(o.clone())),
        );
        let found = triples(store.match_pattern(&pattern));
        assert_eq!(found, vec![(s.clone(), p.clone(), o.clone())], "{st}");
    }
}

#[test]
fn test_conjunction_agrees_with_intersection() {
    let store = graph_store();
    let s = Predicate::eq(C);
    let p = Predicate::eq("follows");
    let o = Predicate::eq(Value::iri(B));

    let by_s = triples(store.match_pattern(&query(Some(s.clone()), None, None)));
    let by_p = triples(store.match_pattern(&query(None, Some(p.clone()), None)));
    let by_o = triples(store.match_pattern(&query(None, None, Some(o.clone()))));
    let intersection: Vec<_> = by_s
        .into_iter()
        .filter(|t| by_p.contains(t) && by_o.contains(t))
        .collect();

    let direct = triples(store.match_pattern(&query(Some(s), Some(p), Some(o))));
    assert_eq!(direct, intersection);
    assert_eq!(direct, vec![link(C, "follows", B)]);
}

#[test]
fn test_fold_into_graph() {
    let store = graph_store();
    let mut graph = Graph::default();
    store
        .match_pattern(&query(None, Some(Predicate::prefix("")), None))
        .fmap(|st| graph.append(st))
        .expect("appending never fails");

    assert_eq!(graph.len(), 7);
    let c = graph.get(&C.into()).expect("C has statements");
    assert_eq!(c.get(&"follows".into()), [Value::iri(B), Value::iri(E)]);
    assert_eq!(c.get(&"relates".into()), [Value::iri(D)]);
    let g = graph.get(&G.into()).expect("G has a status");
    assert_eq!(g.get(&"status".into()), [Value::string("g")]);
}
