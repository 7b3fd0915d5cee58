//! Pattern queries over the permutation indexes.
//!
//! A query is three optional [`Predicate`]s, one per statement position.
//! [`Pattern::new`] classifies them into [`Hint`]s and plans a
//! [`Strategy`]; [`Store::match_pattern`](crate::storage::Store::match_pattern)
//! evaluates the plan lazily.
//!
//! # Example
//!
//! ```
//! use hexastore::query::{Pattern, Predicate};
//! use hexastore::storage::Store;
//! use hexastore::types::Statement;
//!
//! let mut store = Store::new();
//! store.put(Statement::link("s:C", "follows", "u:B")).unwrap();
//! store.put(Statement::link("s:C", "relates", "u:D")).unwrap();
//!
//! let pattern = Pattern::new(Some(Predicate::eq("s:C")), Some(Predicate::prefix("f")), None);
//! let found: Vec<_> = store.match_pattern(&pattern).collect();
//! assert_eq!(found.len(), 1);
//! ```

pub(crate) mod iterator;
mod pattern;
pub(crate) mod predicate;
pub(crate) mod seq;
mod stream;

pub use iterator::Iter;
pub use pattern::{Field, Hint, Pattern, Strategy, query};
pub use predicate::{Clause, Predicate};
pub use seq::Seq;
pub use stream::{
    BoxStream, Filter, Stream, filter_by_object, filter_by_predicate, filter_by_subject,
};
