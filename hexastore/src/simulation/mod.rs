//! Deterministic simulation support.
//!
//! Tools for exercising the store reproducibly:
//! - Controlled time ([`SimulatedTimeSource`])
//! - Seeded fault injection on index writes ([`FaultInjector`])
//! - Index agreement and pattern checks ([`InvariantChecker`])
//!
//! Given the same seeds, a simulated run builds the same skiplist shapes,
//! issues the same K-order tokens and injects the same faults.
//!
//! # Usage
//!
//! ```
//! use hexastore::config::StoreConfig;
//! use hexastore::simulation::{FaultConfig, SimulatedTimeSource, check_index_agreement};
//! use hexastore::storage::Store;
//! use hexastore::types::Statement;
//!
//! let mut store = Store::with_time_source(&StoreConfig::seeded(42), SimulatedTimeSource::default())
//!     .with_faults(FaultConfig::fail_write_at(2));
//!
//! assert!(store.put(Statement::link("u:A", "follows", "u:B")).is_err());
//! assert!(store.put(Statement::link("u:A", "follows", "u:B")).is_ok());
//! assert!(check_index_agreement(&store).is_ok());
//! ```

mod faults;
mod invariants;
mod time;

pub use faults::{FaultConfig, FaultInjector, FaultStats};
pub use invariants::{InvariantChecker, InvariantViolation, brute_force_match, check_index_agreement};
pub use time::SimulatedTimeSource;
