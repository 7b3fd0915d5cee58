//! Simulated time source for deterministic testing.

use std::cell::Cell;
use std::rc::Rc;

use crate::storage::TimeSource;

/// A time source that only moves when told to.
///
/// Clones share the same underlying time, so a test can hand one clone to a
/// [`Store`](crate::storage::Store) and keep another to advance the clock.
///
/// # Thread Safety
///
/// Uses [`Rc`] and [`Cell`]; single-threaded only, like the store itself.
///
/// # Example
///
/// ```
/// use hexastore::simulation::SimulatedTimeSource;
/// use hexastore::storage::TimeSource;
///
/// let time = SimulatedTimeSource::new(1000);
/// let shared = time.clone();
///
/// time.advance(100);
/// assert_eq!(shared.now_ms(), 1100);
///
/// shared.set(5000);
/// assert_eq!(time.now_ms(), 5000);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedTimeSource {
    /// Current simulated time in milliseconds since Unix epoch.
    current_time_ms: Rc<Cell<u64>>,
}

impl SimulatedTimeSource {
    /// Create a time source reading `initial_time_ms`.
    #[must_use]
    pub fn new(initial_time_ms: u64) -> Self {
        Self {
            current_time_ms: Rc::new(Cell::new(initial_time_ms)),
        }
    }

    /// Start at `1_700_000_000_000` (November 2023).
    #[must_use]
    pub fn default_start() -> Self {
        Self::new(1_700_000_000_000)
    }

    /// Advance time, saturating at `u64::MAX`.
    pub fn advance(&self, ms: u64) {
        let current = self.current_time_ms.get();
        self.current_time_ms.set(current.saturating_add(ms));
    }

    /// Set the time. May move it backwards.
    pub fn set(&self, time_ms: u64) {
        self.current_time_ms.set(time_ms);
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now_ms(&self) -> u64 {
        self.current_time_ms.get()
    }
}

impl Default for SimulatedTimeSource {
    fn default() -> Self {
        Self::default_start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_time_advance_and_set() {
        let time = SimulatedTimeSource::new(1000);
        time.advance(100);
        assert_eq!(time.now_ms(), 1100);

        time.set(3000);
        assert_eq!(time.now_ms(), 3000);
    }

    #[test]
    fn test_clones_share_time() {
        let time = SimulatedTimeSource::default();
        let other = time.clone();
        other.advance(7);
        assert_eq!(time.now_ms(), 1_700_000_000_007);
    }

    #[test]
    fn test_advance_saturates() {
        let time = SimulatedTimeSource::new(u64::MAX - 1);
        time.advance(10);
        assert_eq!(time.now_ms(), u64::MAX);
    }
}
