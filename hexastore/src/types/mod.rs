//! Core data types: identifiers, values, statements.

mod graph;
mod iri;
mod korder;
mod statement;
mod value;

pub use graph::{Entity, Graph};
pub use iri::Iri;
pub use korder::KOrder;
pub use statement::{Bag, Statement};
pub use value::{Value, ValueType};

/// A key type that can appear at any level of a permutation index.
///
/// The query layer narrows index levels with prefix and range predicates;
/// this trait supplies the per-type rules it needs beyond `Ord`.
pub trait IndexKey: Ord + Clone + std::fmt::Debug + std::fmt::Display + 'static {
    /// Check whether `self` starts with `prefix`.
    fn has_prefix(&self, prefix: &Self) -> bool;

    /// Check whether two keys belong to the same value domain. Strict bounds
    /// never cross a domain boundary.
    fn same_domain(&self, other: &Self) -> bool;

    /// Whether all keys with this prefix form one contiguous run in key
    /// order.
    fn prefix_is_ordered(&self) -> bool;
}

impl IndexKey for Iri {
    fn has_prefix(&self, prefix: &Self) -> bool {
        Self::has_prefix(self, prefix)
    }

    fn same_domain(&self, _other: &Self) -> bool {
        true
    }

    fn prefix_is_ordered(&self) -> bool {
        true
    }
}

impl IndexKey for Value {
    fn has_prefix(&self, prefix: &Self) -> bool {
        Self::has_prefix(self, prefix)
    }

    fn same_domain(&self, other: &Self) -> bool {
        self.category() == other.category()
    }

    fn prefix_is_ordered(&self) -> bool {
        self.category().is_textual()
    }
}
