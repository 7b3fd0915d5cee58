//! K-order clock.
//!
//! Issues the insertion-order tokens stamped on stored statements. A token
//! combines wall clock time, a logical counter for events within the same
//! millisecond, and the issuing node's id.
//!
//! # Usage
//!
//! ```
//! use hexastore::simulation::SimulatedTimeSource;
//! use hexastore::storage::Clock;
//!
//! let time = SimulatedTimeSource::new(1_000);
//! let mut clock = Clock::new(1, time.clone());
//!
//! let a = clock.tick();
//! let b = clock.tick();
//! assert!(a < b);
//! assert_eq!(b.logical_counter, a.logical_counter + 1);
//!
//! time.advance(5);
//! let c = clock.tick();
//! assert_eq!(c.physical_time, 1_005);
//! assert_eq!(c.logical_counter, 0);
//! ```
//!
//! # Guarantees
//!
//! - Tokens are strictly increasing, even when the time source stalls or
//!   moves backwards.

use crate::storage::time::TimeSource;
use crate::types::KOrder;

/// A hybrid logical clock producing [`KOrder`] tokens.
///
/// Generic over a `TimeSource` so simulation tests control time.
#[derive(Debug)]
pub struct Clock<T: TimeSource> {
    time_source: T,
    /// The last token issued.
    last: KOrder,
    node_id: u32,
}

impl<T: TimeSource> Clock<T> {
    /// Create a clock for `node_id`. No token has been issued yet; the first
    /// `tick` is strictly greater than `last()`.
    #[must_use]
    pub fn new(node_id: u32, time_source: T) -> Self {
        let now = time_source.now_ms();
        Self {
            time_source,
            last: KOrder::new(now, 0, node_id),
            node_id,
        }
    }

    /// Issue the next token.
    pub fn tick(&mut self) -> KOrder {
        let now = self.time_source.now_ms();

        self.last = if now > self.last.physical_time {
            KOrder::new(now, 0, self.node_id)
        } else if let Some(counter) = self.last.logical_counter.checked_add(1) {
            KOrder::new(self.last.physical_time, counter, self.node_id)
        } else {
            // Counter exhausted within one millisecond: borrow from the next.
            KOrder::new(self.last.physical_time.saturating_add(1), 0, self.node_id)
        };

        self.last
    }

    /// The last token issued (or the starting point if none was).
    #[must_use]
    pub const fn last(&self) -> KOrder {
        self.last
    }

    #[must_use]
    pub const fn node_id(&self) -> u32 {
        self.node_id
    }

    #[must_use]
    pub const fn time_source(&self) -> &T {
        &self.time_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulatedTimeSource;
    use crate::storage::time::SystemTimeSource;

    #[test]
    fn test_clock_new() {
        let clock = Clock::new(42, SimulatedTimeSource::new(1_000));
        assert_eq!(clock.node_id(), 42);
        assert_eq!(clock.last(), KOrder::new(1_000, 0, 42));
    }

    #[test]
    fn test_first_tick_is_after_start() {
        let mut clock = Clock::new(1, SimulatedTimeSource::new(1_000));
        let start = clock.last();
        assert!(clock.tick() > start);
    }

    #[test]
    fn test_tick_monotonic_with_system_time() {
        let mut clock = Clock::new(1, SystemTimeSource);
        let mut prev = clock.tick();
        for _ in 0..1_000 {
            let curr = clock.tick();
            assert!(prev < curr, "tokens must strictly increase");
            prev = curr;
        }
    }

    #[test]
    fn test_tick_resets_counter_when_time_advances() {
        let time = SimulatedTimeSource::new(1_000);
        let mut clock = Clock::new(3, time.clone());
        clock.tick();
        clock.tick();
        assert_eq!(clock.last().logical_counter, 2);

        time.advance(1);
        let token = clock.tick();
        assert_eq!(token, KOrder::new(1_001, 0, 3));
    }

    #[test]
    fn test_tick_survives_time_going_backwards() {
        let time = SimulatedTimeSource::new(5_000);
        let mut clock = Clock::new(1, time.clone());
        let before = clock.tick();

        time.set(1_000);
        let after = clock.tick();
        assert!(before < after);
        assert_eq!(after.physical_time, 5_000);
    }

    #[test]
    fn test_tick_rolls_over_exhausted_counter() {
        let time = SimulatedTimeSource::new(10);
        let mut clock = Clock::new(1, time);
        clock.last = KOrder::new(10, u32::MAX, 1);

        let token = clock.tick();
        assert_eq!(token, KOrder::new(11, 0, 1));
    }
}
