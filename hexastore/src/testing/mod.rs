//! Shared test fixtures.

use rand::Rng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::StoreConfig;
use crate::query::{BoxStream, Pattern, Predicate};
use crate::simulation::SimulatedTimeSource;
use crate::storage::Store;
use crate::types::{Bag, Iri, Statement, Value};

pub const A: &str = "u:A";
pub const B: &str = "u:B";
pub const C: &str = "s:C";
pub const D: &str = "u:D";
pub const E: &str = "u:E";
pub const F: &str = "s:F";
pub const G: &str = "s:G";
pub const N: &str = "u:N";

/// Install a test-writer subscriber once per process. Later calls are
/// no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hexastore=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Social graph: `follows`/`relates` edges plus a few `status` literals.
pub fn social_graph() -> Bag {
    vec![
        Statement::link(A, "follows", B),
        Statement::link(C, "follows", B),
        Statement::link(C, "follows", E),
        Statement::link(C, "relates", D),
        Statement::link(D, "relates", B),
        Statement::link(B, "follows", F),
        Statement::link(F, "follows", G),
        Statement::link(D, "relates", G),
        Statement::link(E, "follows", F),
        Statement::new(B, "status", "b"),
        Statement::new(D, "status", "d"),
        Statement::new(G, "status", "g"),
    ]
}

/// A seeded store on simulated time.
pub fn store(seed: u64) -> Store<SimulatedTimeSource> {
    Store::with_time_source(&StoreConfig::seeded(seed), SimulatedTimeSource::default())
}

/// A seeded store holding `bag`.
pub fn store_with(seed: u64, bag: Bag) -> Store<SimulatedTimeSource> {
    let mut store = store(seed);
    store.add(bag).expect("fault-free store accepts every statement");
    store
}

/// Drain a stream into `(s, p, o)` triples, keeping stream order.
pub fn triples(stream: BoxStream<'_>) -> Vec<(Iri, Iri, Value)> {
    stream.map(|st| (st.s, st.p, st.o)).collect()
}

/// Shorthand for an expected triple.
pub fn triple(s: &str, p: &str, o: impl Into<Value>) -> (Iri, Iri, Value) {
    (Iri::from(s), Iri::from(p), o.into())
}

/// Shorthand for an expected link.
pub fn link(s: &str, p: &str, o: &str) -> (Iri, Iri, Value) {
    (Iri::from(s), Iri::from(p), Value::iri(o))
}

/// Random statements over small vocabularies, so patterns hit often.
pub fn random_bag<R: Rng>(rng: &mut R, n: usize) -> Bag {
    (0..n)
        .map(|_| {
            let s = format!("{}:{}", pick(rng, &["s", "u"]), pick(rng, &["a", "ab", "b", "c"]));
            let p = pick(rng, &["follows", "fa", "relates", "status"]);
            let o = random_value(rng);
            let statement = Statement::new(s, p, o);
            if rng.random_bool(0.2) {
                statement.with_credibility(rng.random_range(0.0..1.0))
            } else {
                statement
            }
        })
        .collect()
}

/// A random object value across every category.
pub fn random_value<R: Rng>(rng: &mut R) -> Value {
    match rng.random_range(0..5) {
        0 => Value::Boolean(rng.random_bool(0.5)),
        1 => Value::Integer(rng.random_range(-5..130)),
        2 => Value::Double(f64::from(rng.random_range(-20_i32..20)) / 4.0),
        3 => Value::string(pick(rng, &["a", "ab", "b", "d", "g", "m"])),
        _ => Value::iri(pick(rng, &["s:a", "s:b", "u:a", "u:ab", "u:c"])),
    }
}

/// A random pattern, each field absent or constrained by any clause.
pub fn random_pattern<R: Rng>(rng: &mut R) -> Pattern {
    Pattern::new(
        random_predicate(rng, |rng| {
            Iri::from(pick(rng, &["s:", "s:a", "u:", "u:a", "u:ab", "u:b", "v:"]))
        }),
        random_predicate(rng, |rng| {
            Iri::from(pick(rng, &["f", "fa", "follows", "r", "relates", "status"]))
        }),
        random_predicate(rng, random_value),
    )
}

fn random_predicate<T, R, G>(rng: &mut R, mut value: G) -> Option<Predicate<T>>
where
    T: Ord,
    R: Rng,
    G: FnMut(&mut R) -> T,
{
    match rng.random_range(0..6) {
        0 => None,
        1 => Some(Predicate::Eq(value(rng))),
        2 => Some(Predicate::Prefix(value(rng))),
        3 => Some(Predicate::Lt(value(rng))),
        4 => Some(Predicate::Gt(value(rng))),
        _ => {
            let (a, b) = (value(rng), value(rng));
            Some(if a <= b {
                Predicate::In(a, b)
            } else {
                Predicate::In(b, a)
            })
        }
    }
}

fn pick<'a, R: Rng>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}
