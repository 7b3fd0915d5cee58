//! Invariant checking for the permutation indexes.
//!
//! The six indexes are redundant copies of one statement set. After any
//! sequence of writes (including failed, compensated ones) they must agree:
//!
//! - every index holds exactly `store.len()` versions;
//! - every version in `SPO` is present in the other five;
//! - every index yields its versions in its own field order, then K;
//! - matching a pattern returns exactly what filtering a full scan with
//!   the same predicates returns.

use std::fmt;

use crate::query::{BoxStream, Pattern};
use crate::storage::{Layout, Ops, Osp, Permutation, Pos, Pso, Sop, Spo, Store, TimeSource};
use crate::types::{Iri, KOrder, Statement, Value};

/// An invariant violation found in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violation.
    pub description: String,
    /// Additional context.
    pub context: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            f.write_str(&self.description)
        } else {
            write!(f, "{} ({})", self.description, self.context)
        }
    }
}

/// Collects violations across checks.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    violations: Vec<InvariantViolation>,
}

impl InvariantChecker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        &self.violations
    }

    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn clear(&mut self) {
        self.violations.clear();
    }

    /// Check that all six indexes hold the same versions, in order.
    pub fn check_index_agreement<T: TimeSource>(&mut self, store: &Store<T>) {
        for permutation in Permutation::WRITE_ORDER {
            let len = store.index_len(permutation);
            if len != store.len() {
                self.violate(
                    "index size differs from store size",
                    format!("{permutation} holds {len}, store holds {}", store.len()),
                );
            }
        }

        for statement in store.scan(Permutation::Spo) {
            for permutation in Permutation::WRITE_ORDER {
                if !store.index_contains(permutation, &statement) {
                    self.violate(
                        "version missing from index",
                        format!("{statement} k={} not in {permutation}", statement.k),
                    );
                }
            }
        }

        self.check_order::<Spo, T>(store);
        self.check_order::<Sop, T>(store);
        self.check_order::<Pso, T>(store);
        self.check_order::<Pos, T>(store);
        self.check_order::<Osp, T>(store);
        self.check_order::<Ops, T>(store);
    }

    /// Check that matching `pattern` agrees with a filtered full scan.
    pub fn check_pattern<T: TimeSource>(&mut self, store: &Store<T>, pattern: &Pattern) {
        let found = sorted(store.match_pattern(pattern));
        let expected = sorted(Box::new(
            store
                .scan(Permutation::Spo)
                .filter(|st| brute_force_match(pattern, st)),
        ));

        if found != expected {
            self.violate(
                "pattern result differs from full scan",
                format!(
                    "{pattern} [{}] returned {} versions, expected {}",
                    pattern.strategy(),
                    found.len(),
                    expected.len()
                ),
            );
        }
    }

    fn check_order<L: Layout, T: TimeSource>(&mut self, store: &Store<T>) {
        let versions: Vec<Statement> = store.scan(L::PERMUTATION).collect();
        for pair in versions.windows(2) {
            let before = (L::project(&pair[0]), pair[0].k);
            let after = (L::project(&pair[1]), pair[1].k);
            if before >= after {
                self.violate(
                    "index yields versions out of order",
                    format!("{} after {} in {}", pair[1], pair[0], L::PERMUTATION),
                );
            }
        }
    }

    fn violate(&mut self, description: &str, context: String) {
        tracing::warn!(description, %context, "invariant violated");
        self.violations.push(InvariantViolation {
            description: description.to_string(),
            context,
        });
    }
}

/// Run [`InvariantChecker::check_index_agreement`] on its own.
///
/// # Errors
///
/// Every violation found.
pub fn check_index_agreement<T: TimeSource>(
    store: &Store<T>,
) -> Result<(), Vec<InvariantViolation>> {
    let mut checker = InvariantChecker::new();
    checker.check_index_agreement(store);
    if checker.has_violations() {
        Err(checker.violations)
    } else {
        Ok(())
    }
}

/// Evaluate a pattern against one statement without any index.
#[must_use]
pub fn brute_force_match(pattern: &Pattern, statement: &Statement) -> bool {
    pattern.s().is_none_or(|p| p.matches(&statement.s))
        && pattern.p().is_none_or(|p| p.matches(&statement.p))
        && pattern.o().is_none_or(|p| p.matches(&statement.o))
}

fn sorted(stream: BoxStream<'_>) -> Vec<(Iri, Iri, Value, KOrder)> {
    let mut keys: Vec<_> = stream.map(|st| (st.s, st.p, st.o, st.k)).collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::query::Predicate;
    use crate::simulation::{FaultConfig, SimulatedTimeSource};

    fn store() -> Store<SimulatedTimeSource> {
        Store::with_time_source(&StoreConfig::seeded(11), SimulatedTimeSource::new(1))
    }

    fn populate<T: TimeSource>(store: &mut Store<T>) {
        for st in [
            Statement::link("u:A", "follows", "u:B"),
            Statement::link("s:C", "relates", "u:D"),
            Statement::new("u:B", "status", "b"),
            Statement::new("u:B", "status", "b"),
        ] {
            // compensated failures are expected in the faulty stores
            let _ = store.put(st);
        }
    }

    #[test]
    fn test_healthy_store_has_no_violations() {
        let mut store = store();
        populate(&mut store);
        assert_eq!(check_index_agreement(&store), Ok(()));
    }

    #[test]
    fn test_compensated_failures_keep_agreement() {
        let mut store = store().with_faults(FaultConfig::fail_write_at(8));
        populate(&mut store);
        assert_eq!(store.len(), 3);
        assert_eq!(check_index_agreement(&store), Ok(()));
    }

    #[test]
    fn test_failed_cut_is_detected() {
        let mut store = store().with_faults(FaultConfig::fail_write_at(3).with_failing_cuts());
        populate(&mut store);

        let violations = check_index_agreement(&store).expect_err("partial write left behind");
        assert!(
            violations
                .iter()
                .any(|v| v.description == "index size differs from store size")
        );
    }

    #[test]
    fn test_pattern_check_agrees() {
        let mut store = store();
        populate(&mut store);

        let mut checker = InvariantChecker::new();
        checker.check_pattern(&store, &Pattern::new(None, Some(Predicate::prefix("st")), None));
        checker.check_pattern(&store, &Pattern::new(None, None, Some(Predicate::gt("a"))));
        checker.check_pattern(&store, &Pattern::all());
        assert!(!checker.has_violations(), "{:?}", checker.violations());
    }

    #[test]
    fn test_brute_force_match() {
        let st = Statement::new("u:B", "status", "b");
        assert!(brute_force_match(&Pattern::all(), &st));
        assert!(brute_force_match(
            &Pattern::new(Some(Predicate::eq("u:B")), None, Some(Predicate::lt("c"))),
            &st
        ));
        assert!(!brute_force_match(
            &Pattern::new(None, None, Some(Predicate::lt(Value::iri("z")))),
            &st
        ));
    }

    #[test]
    fn test_violation_display() {
        let violation = InvariantViolation {
            description: "broken".to_string(),
            context: "spo".to_string(),
        };
        assert_eq!(violation.to_string(), "broken (spo)");
    }
}
