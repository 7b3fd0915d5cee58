//! Re-inserting a triple keeps every version.

use crate::config::StoreConfig;
use crate::query::{Predicate, query};
use crate::simulation::SimulatedTimeSource;
use crate::storage::Store;
use crate::testing::{init_tracing, store};
use crate::types::{KOrder, Statement, Value};

#[test]
fn test_duplicates_are_separate_versions() {
    init_tracing();
    let mut store = store(21);
    let st = Statement::link("u:A", "follows", "u:B");

    let first = store.put(st.clone()).expect("put");
    let second = store.put(st.clone().with_credibility(0.5)).expect("put");
    assert!(first < second);
    assert_eq!(store.len(), 2);

    let pattern = query(
        Some(Predicate::eq("u:A")),
        Some(Predicate::eq("follows")),
        Some(Predicate::eq(Value::iri("u:B"))),
    );
    let versions: Vec<(KOrder, Option<f64>)> = store
        .match_pattern(&pattern)
        .map(|st| (st.k, st.c))
        .collect();
    assert_eq!(versions, vec![(first, None), (second, Some(0.5))]);
}

#[test]
fn test_versions_share_a_stalled_clock() {
    let mut store = store(22);
    let st = Statement::new("u:B", "status", "b");

    let ks: Vec<KOrder> = (0..4)
        .map(|_| store.put(st.clone()).expect("put"))
        .collect();

    assert!(ks.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(ks.iter().all(|k| k.physical_time == ks[0].physical_time));
    assert_eq!(
        ks.iter().map(|k| k.logical_counter).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn test_advancing_time_resets_the_counter() {
    let time = SimulatedTimeSource::new(10);
    let mut store = Store::with_time_source(&StoreConfig::seeded(23), time.clone());

    let a = store.put(Statement::new("u:B", "status", "b")).expect("put");
    let b = store.put(Statement::new("u:B", "status", "b")).expect("put");
    time.advance(5);
    let c = store.put(Statement::new("u:B", "status", "b")).expect("put");

    assert_eq!((a.physical_time, a.logical_counter), (10, 1));
    assert_eq!((b.physical_time, b.logical_counter), (10, 2));
    assert_eq!((c.physical_time, c.logical_counter), (15, 0));
}

#[test]
fn test_every_index_keeps_both_versions() {
    let mut store = store(24);
    let st = Statement::new("u:B", "status", "b");
    store.put(st.clone()).expect("put");
    store.put(st).expect("put");

    for pattern in [
        query(Some(Predicate::eq("u:B")), None, None),
        query(None, Some(Predicate::eq("status")), None),
        query(None, None, Some(Predicate::eq("b"))),
        query(Some(Predicate::prefix("u:")), None, Some(Predicate::eq("b"))),
    ] {
        assert_eq!(store.match_pattern(&pattern).count(), 2, "{pattern}");
    }
}
