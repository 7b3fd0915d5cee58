//! End-to-end tests at the store level.
//!
//! Each test file covers a specific scenario, using seeded stores and
//! deterministic inputs to verify the complete write, plan and match cycle.

#![cfg(test)]

mod test_codec;
mod test_duplicates;
mod test_index_agreement;
mod test_ranges;
mod test_rollback;
mod test_social_graph;
mod test_strategy_table;
