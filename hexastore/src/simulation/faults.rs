//! Write-fault injection for index maintenance.
//!
//! The in-memory indexes cannot fail on their own. A store built with
//! [`Store::with_faults`](crate::storage::Store::with_faults) consults a
//! `FaultInjector` before every per-index write and every compensating cut,
//! which exercises the rollback path a fallible backing medium would take.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for fault injection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaultConfig {
    /// Probability of a per-index write failing (0.0 - 1.0).
    pub write_error_rate: f64,
    /// Probability of a compensating cut failing (0.0 - 1.0).
    pub cut_error_rate: f64,
    /// Fail exactly this index write, counted from zero over the store's
    /// lifetime. Applied in addition to `write_error_rate`.
    pub fail_write_at: Option<u64>,
}

impl FaultConfig {
    /// No faults (baseline).
    #[must_use]
    pub fn no_faults() -> Self {
        Self::default()
    }

    /// Low fault rates, for long randomized runs.
    #[must_use]
    pub const fn low_faults() -> Self {
        Self {
            write_error_rate: 0.001,
            cut_error_rate: 0.001,
            fail_write_at: None,
        }
    }

    /// High fault rates.
    #[must_use]
    pub const fn high_faults() -> Self {
        Self {
            write_error_rate: 0.05,
            cut_error_rate: 0.05,
            fail_write_at: None,
        }
    }

    /// Fail only the `n`-th index write.
    #[must_use]
    pub const fn fail_write_at(n: u64) -> Self {
        Self {
            write_error_rate: 0.0,
            cut_error_rate: 0.0,
            fail_write_at: Some(n),
        }
    }

    /// Make every compensating cut fail.
    #[must_use]
    pub const fn with_failing_cuts(mut self) -> Self {
        self.cut_error_rate = 1.0;
        self
    }
}

/// Counters for injected and attempted operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FaultStats {
    /// Per-index writes attempted.
    pub writes: u64,
    /// Compensating cuts attempted.
    pub cuts: u64,
    /// Writes failed by injection.
    pub injected_write_errors: u64,
    /// Cuts failed by injection.
    pub injected_cut_errors: u64,
}

/// Seeded decision source for injected faults.
#[derive(Debug)]
pub struct FaultInjector {
    config: FaultConfig,
    rng: StdRng,
    stats: FaultStats,
}

impl FaultInjector {
    /// Create an injector. The same seed yields the same fault sequence.
    #[must_use]
    pub fn new(config: FaultConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            stats: FaultStats::default(),
        }
    }

    #[must_use]
    pub const fn stats(&self) -> &FaultStats {
        &self.stats
    }

    #[must_use]
    pub const fn config(&self) -> &FaultConfig {
        &self.config
    }

    /// Record a write attempt and decide whether it fails.
    pub fn should_fail_write(&mut self) -> bool {
        let index = self.stats.writes;
        self.stats.writes += 1;

        let fail = self.config.fail_write_at == Some(index)
            || Self::roll(&mut self.rng, self.config.write_error_rate);
        if fail {
            self.stats.injected_write_errors += 1;
        }
        fail
    }

    /// Record a cut attempt and decide whether it fails.
    pub fn should_fail_cut(&mut self) -> bool {
        self.stats.cuts += 1;
        let fail = Self::roll(&mut self.rng, self.config.cut_error_rate);
        if fail {
            self.stats.injected_cut_errors += 1;
        }
        fail
    }

    fn roll(rng: &mut StdRng, rate: f64) -> bool {
        if rate <= 0.0 {
            return false;
        }
        rng.random::<f64>() < rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_faults_never_fails() {
        let mut injector = FaultInjector::new(FaultConfig::no_faults(), 1);
        for _ in 0..1_000 {
            assert!(!injector.should_fail_write());
            assert!(!injector.should_fail_cut());
        }
        assert_eq!(injector.stats().writes, 1_000);
        assert_eq!(injector.stats().injected_write_errors, 0);
    }

    #[test]
    fn test_fail_write_at_hits_exactly_once() {
        let mut injector = FaultInjector::new(FaultConfig::fail_write_at(3), 1);
        let outcomes: Vec<bool> = (0..6).map(|_| injector.should_fail_write()).collect();
        assert_eq!(outcomes, vec![false, false, false, true, false, false]);
        assert_eq!(injector.stats().injected_write_errors, 1);
    }

    #[test]
    fn test_failing_cuts() {
        let mut injector = FaultInjector::new(FaultConfig::no_faults().with_failing_cuts(), 1);
        assert!(injector.should_fail_cut());
        assert!(!injector.should_fail_write());
        assert_eq!(injector.stats().injected_cut_errors, 1);
    }

    #[test]
    fn test_same_seed_same_faults() {
        let run = |seed| {
            let mut injector = FaultInjector::new(FaultConfig::high_faults(), seed);
            (0..500).map(|_| injector.should_fail_write()).collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
        assert!(run(9).iter().any(|failed| *failed));
    }
}
