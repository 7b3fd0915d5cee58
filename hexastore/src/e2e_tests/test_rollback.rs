//! Failed writes, compensation and batch remainders.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::query::Pattern;
use crate::simulation::{
    FaultConfig, InvariantChecker, SimulatedTimeSource, check_index_agreement,
};
use crate::storage::{Permutation, Store, StoreError};
use crate::testing::{init_tracing, random_bag, random_pattern, social_graph, store, triples};
use crate::types::Statement;

fn faulty(seed: u64, config: FaultConfig) -> Store<SimulatedTimeSource> {
    init_tracing();
    store(seed).with_faults(config)
}

#[test]
fn test_failure_at_each_index_rolls_back() {
    for (n, permutation) in (0_u64..).zip(Permutation::WRITE_ORDER) {
        let mut store = faulty(30, FaultConfig::fail_write_at(n));
        let err = store
            .put(Statement::link("u:A", "follows", "u:B"))
            .expect_err("injected failure");

        assert_eq!(err, StoreError::WriteFailed { permutation });
        assert!(store.is_empty());
        assert_eq!(store.match_pattern(&Pattern::all()).count(), 0);
        assert_eq!(check_index_agreement(&store), Ok(()), "failed at {permutation}");

        let stats = store.fault_stats().expect("faults enabled");
        assert_eq!(stats.cuts, n);
        assert_eq!(stats.injected_write_errors, 1);
    }
}

#[test]
fn test_failed_compensation_leaves_partial_statement() {
    let mut store = faulty(31, FaultConfig::fail_write_at(4).with_failing_cuts());
    assert!(store.put(Statement::new("u:B", "status", "b")).is_err());

    assert!(store.is_empty());
    for permutation in &Permutation::WRITE_ORDER[..4] {
        assert_eq!(store.index_len(*permutation), 1, "{permutation}");
    }
    for permutation in &Permutation::WRITE_ORDER[4..] {
        assert_eq!(store.index_len(*permutation), 0, "{permutation}");
    }
    assert_eq!(
        store.fault_stats().map(|stats| stats.injected_cut_errors),
        Some(4)
    );

    let violations = check_index_agreement(&store).expect_err("indexes disagree");
    assert!(!violations.is_empty());
}

#[test]
fn test_add_returns_remainder_and_resumes() {
    let bag = social_graph();
    let mut store = faulty(32, FaultConfig::fail_write_at(13));

    let err = store.add(bag.clone()).expect_err("third statement fails");
    assert_eq!(err.source, StoreError::WriteFailed {
        permutation: Permutation::Sop,
    });
    assert_eq!(store.len(), 2);
    assert_eq!(err.remainder, bag[2..]);

    assert_eq!(store.add(err.remainder).expect("resume"), bag.len() - 2);
    assert_eq!(store.len(), bag.len());
    assert_eq!(check_index_agreement(&store), Ok(()));

    let mut clean = store_without_faults();
    clean.add(bag).expect("add");
    assert_eq!(
        triples(store.match_pattern(&Pattern::all())),
        triples(clean.match_pattern(&Pattern::all()))
    );
}

fn store_without_faults() -> Store<SimulatedTimeSource> {
    store(33)
}

#[test]
fn test_random_write_faults_keep_indexes_consistent() {
    let mut rng = StdRng::seed_from_u64(34);
    let config = FaultConfig {
        write_error_rate: 0.1,
        ..FaultConfig::no_faults()
    };
    let mut store = faulty(34, config);

    let mut stored = 0;
    let mut failed = 0;
    for st in random_bag(&mut rng, 200) {
        match store.put(st) {
            Ok(_) => stored += 1,
            Err(StoreError::WriteFailed { .. }) => failed += 1,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(store.len(), stored);
    let stats = store.fault_stats().expect("faults enabled");
    assert_eq!(stats.injected_write_errors, failed);
    assert_eq!(stats.injected_cut_errors, 0);

    let mut checker = InvariantChecker::new();
    checker.check_index_agreement(&store);
    for _ in 0..100 {
        checker.check_pattern(&store, &random_pattern(&mut rng));
    }
    assert!(!checker.has_violations(), "{:?}", checker.violations());
}

#[test]
fn test_faults_are_reproducible() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(35);
        let mut store = faulty(35, FaultConfig::high_faults());
        random_bag(&mut rng, 100)
            .into_iter()
            .map(|st| store.put(st).is_ok())
            .collect::<Vec<bool>>()
    };
    assert_eq!(run(), run());
}
