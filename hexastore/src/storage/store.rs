//! The hexastore.
//!
//! A [`Store`] keeps every statement in six permutation indexes and answers
//! [`Pattern`]s from whichever index the pattern's strategy names.
//!
//! # Usage
//!
//! ```
//! use hexastore::query::{Pattern, Predicate};
//! use hexastore::storage::Store;
//! use hexastore::types::Statement;
//!
//! let mut store = Store::new();
//! store.put(Statement::link("u:A", "follows", "u:B"))?;
//! store.put(Statement::new("u:B", "status", "b"))?;
//!
//! let pattern = Pattern::new(None, Some(Predicate::eq("follows")), None);
//! let found: Vec<_> = store.match_pattern(&pattern).collect();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].s.as_str(), "u:A");
//! # Ok::<(), hexastore::storage::StoreError>(())
//! ```
//!
//! # Write path
//!
//! `put` stamps the statement with the next K-order token and writes it to
//! the six indexes in [`Permutation::WRITE_ORDER`]. If one write fails, the
//! indexes already written are compensated by removing the statement again.
//! Compensation is best effort: a compensating cut that itself fails is
//! logged and skipped, leaving the statement in that index.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::StoreConfig;
use crate::query::{
    BoxStream, Iter, Pattern, Predicate, Strategy, filter_by_object, filter_by_predicate,
    filter_by_subject,
};
use crate::simulation::{FaultConfig, FaultInjector, FaultStats};
use crate::storage::clock::Clock;
use crate::storage::error::{AddError, StoreError};
use crate::storage::index::{Index, Layout, Levels, Ops, Osp, Permutation, Pos, Pso, Sop, Spo};
use crate::storage::time::{SystemTimeSource, TimeSource};
use crate::types::{Bag, IndexKey, KOrder, Statement};

/// In-memory hexastore.
///
/// Generic over a `TimeSource` so simulation tests control the K-order
/// clock.
#[derive(Debug)]
pub struct Store<T: TimeSource = SystemTimeSource> {
    clock: Clock<T>,
    rng: StdRng,
    faults: Option<FaultInjector>,
    spo: Index<Spo>,
    sop: Index<Sop>,
    pso: Index<Pso>,
    pos: Index<Pos>,
    osp: Index<Osp>,
    ops: Index<Ops>,
    /// Number of stored statements.
    len: usize,
}

impl Store<SystemTimeSource> {
    /// Create an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Create an empty store on the system clock.
    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        Self::with_time_source(config, SystemTimeSource)
    }
}

impl Default for Store<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> Store<T> {
    /// Create an empty store on `time_source`.
    ///
    /// A seeded configuration makes skiplist tower heights, and therefore
    /// the whole in-memory layout, reproducible.
    #[must_use]
    pub fn with_time_source(config: &StoreConfig, time_source: T) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let max_level = config.max_level;

        tracing::debug!(
            node_id = config.node_id,
            max_level,
            seed = ?config.seed,
            "creating store"
        );

        Self {
            clock: Clock::new(config.node_id, time_source),
            rng,
            faults: None,
            spo: Index::new(max_level),
            sop: Index::new(max_level),
            pso: Index::new(max_level),
            pos: Index::new(max_level),
            osp: Index::new(max_level),
            ops: Index::new(max_level),
            len: 0,
        }
    }

    /// Enable fault injection on index writes and compensating cuts.
    ///
    /// The injector is seeded from the store's own random source, so a
    /// seeded store injects the same faults on every run.
    #[must_use]
    pub fn with_faults(mut self, config: FaultConfig) -> Self {
        let seed = self.rng.random();
        tracing::debug!(?config, "enabling fault injection");
        self.faults = Some(FaultInjector::new(config, seed));
        self
    }

    /// Counters of the fault injector, if one is installed.
    #[must_use]
    pub fn fault_stats(&self) -> Option<&FaultStats> {
        self.faults.as_ref().map(FaultInjector::stats)
    }

    /// Number of stored statements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The store's K-order clock.
    #[must_use]
    pub const fn clock(&self) -> &Clock<T> {
        &self.clock
    }

    /// Store one statement, stamping it with a fresh K-order token.
    ///
    /// Any K the caller set is replaced. Returns the token assigned.
    ///
    /// # Errors
    ///
    /// [`StoreError::WriteFailed`] if an index write fails. The indexes
    /// written before it are compensated on a best-effort basis; the
    /// statement is not counted as stored.
    pub fn put(&mut self, statement: Statement) -> Result<KOrder, StoreError> {
        let statement = Statement {
            k: self.clock.tick(),
            ..statement
        };

        for (written, permutation) in Permutation::WRITE_ORDER.into_iter().enumerate() {
            if let Err(err) = self.write(permutation, &statement) {
                tracing::warn!(%permutation, k = %statement.k, "index write failed, compensating");
                self.compensate(&Permutation::WRITE_ORDER[..written], &statement);
                return Err(err);
            }
        }

        self.len += 1;
        tracing::trace!(k = %statement.k, "stored {statement}");
        Ok(statement.k)
    }

    /// Store a batch in order, stopping at the first failure.
    ///
    /// Returns how many statements were stored.
    ///
    /// # Errors
    ///
    /// [`AddError`] carrying the failing statement and everything after it.
    pub fn add(&mut self, mut bag: Bag) -> Result<usize, AddError> {
        let mut stored = 0;
        let mut failure = None;

        for statement in &bag {
            match self.put(statement.clone()) {
                Ok(_) => stored += 1,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        match failure {
            None => Ok(stored),
            Some(source) => {
                let remainder = bag.split_off(stored);
                tracing::warn!(
                    stored,
                    remaining = remainder.len(),
                    error = %source,
                    "batch insert stopped"
                );
                Err(AddError { remainder, source })
            }
        }
    }

    /// Lazily match `pattern` against the index its strategy selects.
    ///
    /// Each index level resolves its own predicate; prefixes the index
    /// cannot order (non-textual objects) are applied as residual filters
    /// on the resulting stream.
    #[must_use]
    pub fn match_pattern(&self, pattern: &Pattern) -> BoxStream<'_> {
        let strategy = pattern.strategy();
        tracing::debug!(%pattern, %strategy, "matching pattern");

        let stream: BoxStream<'_> = match strategy {
            Strategy::None | Strategy::Spo => Box::new(Iter::new(&self.spo, pattern)),
            Strategy::Sop => Box::new(Iter::new(&self.sop, pattern)),
            Strategy::Pso => Box::new(Iter::new(&self.pso, pattern)),
            Strategy::Pos => Box::new(Iter::new(&self.pos, pattern)),
            Strategy::Osp => Box::new(Iter::new(&self.osp, pattern)),
            Strategy::Ops => Box::new(Iter::new(&self.ops, pattern)),
        };

        let stream = filter_by_subject(pattern.hint_for_s(), residual(pattern.s()), stream);
        let stream = filter_by_predicate(pattern.hint_for_p(), residual(pattern.p()), stream);
        filter_by_object(pattern.hint_for_o(), residual(pattern.o()), stream)
    }

    /// Every stored version in one index's order.
    #[must_use]
    pub fn scan(&self, permutation: Permutation) -> BoxStream<'_> {
        match permutation {
            Permutation::Spo => scan(&self.spo),
            Permutation::Sop => scan(&self.sop),
            Permutation::Pso => scan(&self.pso),
            Permutation::Pos => scan(&self.pos),
            Permutation::Osp => scan(&self.osp),
            Permutation::Ops => scan(&self.ops),
        }
    }

    /// Number of versions held by one index.
    #[must_use]
    pub const fn index_len(&self, permutation: Permutation) -> usize {
        match permutation {
            Permutation::Spo => self.spo.len(),
            Permutation::Sop => self.sop.len(),
            Permutation::Pso => self.pso.len(),
            Permutation::Pos => self.pos.len(),
            Permutation::Osp => self.osp.len(),
            Permutation::Ops => self.ops.len(),
        }
    }

    /// Whether one index holds this exact version (same triple and K).
    #[must_use]
    pub fn index_contains(&self, permutation: Permutation, statement: &Statement) -> bool {
        match permutation {
            Permutation::Spo => self.spo.contains(statement),
            Permutation::Sop => self.sop.contains(statement),
            Permutation::Pso => self.pso.contains(statement),
            Permutation::Pos => self.pos.contains(statement),
            Permutation::Osp => self.osp.contains(statement),
            Permutation::Ops => self.ops.contains(statement),
        }
    }

    fn write(&mut self, permutation: Permutation, statement: &Statement) -> Result<(), StoreError> {
        if self
            .faults
            .as_mut()
            .is_some_and(FaultInjector::should_fail_write)
        {
            return Err(StoreError::WriteFailed { permutation });
        }

        tracing::trace!(%permutation, k = %statement.k, "index write");
        let rng = &mut self.rng;
        match permutation {
            Permutation::Spo => self.spo.insert(statement, rng),
            Permutation::Sop => self.sop.insert(statement, rng),
            Permutation::Pso => self.pso.insert(statement, rng),
            Permutation::Pos => self.pos.insert(statement, rng),
            Permutation::Osp => self.osp.insert(statement, rng),
            Permutation::Ops => self.ops.insert(statement, rng),
        }
        Ok(())
    }

    fn cut(&mut self, permutation: Permutation, statement: &Statement) -> Result<(), StoreError> {
        if self
            .faults
            .as_mut()
            .is_some_and(FaultInjector::should_fail_cut)
        {
            return Err(StoreError::CutFailed { permutation });
        }

        let removed = match permutation {
            Permutation::Spo => self.spo.remove(statement),
            Permutation::Sop => self.sop.remove(statement),
            Permutation::Pso => self.pso.remove(statement),
            Permutation::Pos => self.pos.remove(statement),
            Permutation::Osp => self.osp.remove(statement),
            Permutation::Ops => self.ops.remove(statement),
        };
        if !removed {
            tracing::debug!(%permutation, k = %statement.k, "nothing to cut");
        }
        Ok(())
    }

    /// Undo the writes to `written`, newest first.
    fn compensate(&mut self, written: &[Permutation], statement: &Statement) {
        for &permutation in written.iter().rev() {
            if let Err(err) = self.cut(permutation, statement) {
                tracing::warn!(
                    %permutation,
                    k = %statement.k,
                    error = %err,
                    "compensating cut failed, statement left in index"
                );
            }
        }
    }
}

fn scan<L: Layout>(index: &Index<L>) -> BoxStream<'_> {
    Box::new(Iter::with_levels(index, Levels::default()))
}

/// The part of a predicate no index level can evaluate.
fn residual<T: IndexKey>(predicate: Option<&Predicate<T>>) -> Option<Predicate<T>> {
    predicate
        .filter(|predicate| !predicate.is_index_ordered())
        .cloned()
}
