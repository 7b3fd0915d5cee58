//! Insertion-order tokens.
//!
//! A `KOrder` is stamped on every statement when it is stored. It keys the
//! innermost level of each permutation index, so statements sharing the same
//! subject, predicate and object coexist as distinct versions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hybrid logical timestamp used as the insertion-order key.
///
/// # Invariants
///
/// - Ordering is lexicographic over `(physical_time, logical_counter, node_id)`
///   (field declaration order, so the derived `Ord` is the intended one).
/// - Tokens issued by one [`Clock`](crate::storage::Clock) are strictly
///   increasing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct KOrder {
    /// Wall clock time in milliseconds since Unix epoch.
    pub physical_time: u64,
    /// Tie-breaker for tokens issued within the same millisecond.
    pub logical_counter: u32,
    /// Identifier of the store node that issued the token.
    pub node_id: u32,
}

impl KOrder {
    /// The token carried by statements that have not been stored yet.
    pub const ZERO: Self = Self {
        physical_time: 0,
        logical_counter: 0,
        node_id: 0,
    };

    /// Create a token from its parts.
    #[must_use]
    pub const fn new(physical_time: u64, logical_counter: u32, node_id: u32) -> Self {
        Self {
            physical_time,
            logical_counter,
            node_id,
        }
    }

    /// Whether this token was issued by a clock.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.physical_time != 0 || self.logical_counter != 0 || self.node_id != 0
    }
}

impl fmt::Display for KOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}@{}",
            self.physical_time, self.logical_counter, self.node_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_korder_ordering() {
        let a = KOrder::new(100, 0, 1);
        let b = KOrder::new(100, 1, 0);
        let c = KOrder::new(101, 0, 0);
        assert!(a < b);
        assert!(b < c);
        assert!(KOrder::new(100, 0, 1) < KOrder::new(100, 0, 2));
    }

    #[test]
    fn test_korder_zero_is_unassigned() {
        assert!(!KOrder::ZERO.is_assigned());
        assert!(KOrder::new(0, 1, 0).is_assigned());
        assert_eq!(KOrder::default(), KOrder::ZERO);
    }

    #[test]
    fn test_korder_display() {
        assert_eq!(KOrder::new(1000, 2, 7).to_string(), "1000.2@7");
    }
}
