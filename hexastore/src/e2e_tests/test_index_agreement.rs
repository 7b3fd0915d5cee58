//! Random patterns against a brute-force oracle.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::query::{Pattern, Predicate};
use crate::simulation::{InvariantChecker, check_index_agreement};
use crate::testing::{init_tracing, random_bag, random_pattern, store, store_with};
use crate::types::{Statement, Value};

#[test]
fn test_random_patterns_agree_with_full_scan() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let store = store_with(1, random_bag(&mut rng, 300));
    assert_eq!(check_index_agreement(&store), Ok(()));

    let mut checker = InvariantChecker::new();
    for _ in 0..500 {
        checker.check_pattern(&store, &random_pattern(&mut rng));
    }
    assert!(!checker.has_violations(), "{:?}", checker.violations());
}

#[test]
fn test_agreement_across_seeds() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let store = store_with(seed, random_bag(&mut rng, 60));

        let mut checker = InvariantChecker::new();
        checker.check_index_agreement(&store);
        for _ in 0..100 {
            checker.check_pattern(&store, &random_pattern(&mut rng));
        }
        assert!(
            !checker.has_violations(),
            "seed {seed}: {:?}",
            checker.violations()
        );
    }
}

#[test]
fn test_same_seed_same_results() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(77);
        let store = store_with(77, random_bag(&mut rng, 100));
        let pattern = random_pattern(&mut rng);
        store.match_pattern(&pattern).collect::<Vec<Statement>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_every_strategy_sees_the_same_statement() {
    let mut store = store(5);
    store
        .put(Statement::new("u:A", "age", 42_i64).with_credibility(0.75))
        .expect("put");

    let s = || Some(Predicate::eq("u:A"));
    let p = || Some(Predicate::eq("age"));
    let o = || Some(Predicate::eq(Value::Integer(42)));
    let patterns = [
        Pattern::new(s(), None, None),
        Pattern::new(s(), None, o()),
        Pattern::new(None, p(), None),
        Pattern::new(None, p(), o()),
        Pattern::new(None, None, o()),
        Pattern::new(Some(Predicate::gt("u:")), None, o()),
        Pattern::all(),
    ];

    let found: Vec<Statement> = patterns
        .iter()
        .flat_map(|pattern| store.match_pattern(pattern).collect::<Vec<_>>())
        .collect();
    assert_eq!(found.len(), patterns.len());
    assert!(found.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(found[0].c, Some(0.75));
}

#[test]
fn test_empty_store_matches_nothing() {
    let store = store(9);
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..50 {
        let pattern = random_pattern(&mut rng);
        assert_eq!(store.match_pattern(&pattern).count(), 0, "{pattern}");
    }
    assert_eq!(check_index_agreement(&store), Ok(()));
}
