//! Wall clock abstraction behind K-order tokens.
//!
//! Production stores read the system clock; tests plug in
//! [`SimulatedTimeSource`](crate::simulation::SimulatedTimeSource) so that
//! every issued token is reproducible.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall clock time in milliseconds since Unix epoch.
pub trait TimeSource {
    fn now_ms(&self) -> u64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    #[allow(clippy::cast_possible_truncation)] // u64 milliseconds last for millions of years
    fn now_ms(&self) -> u64 {
        // A clock set before 1970 reads as the epoch; the K-order clock still
        // issues increasing tokens through its logical counter.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source() {
        let source = SystemTimeSource;
        let t1 = source.now_ms();
        let t2 = source.now_ms();

        // After 2020-01-01 00:00:00 UTC
        assert!(t1 > 1_577_836_800_000);
        assert!(t2 >= t1);
    }
}
