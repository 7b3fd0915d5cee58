// Life of a query:
// 1. Caller builds a Pattern from up to three predicates
// 2. Each predicate is classified into a hint
// 3. The hints pick one of the six permutation indexes
// 4. An iterator descends that index level by level, narrowing each
//    skiplist with the level's predicate
// 5. Whatever the index could not order is filtered from the stream
//
// Life of a write:
// 1. Statement is stamped with a fresh K-order token
// 2. Written to SPO, SOP, POS, PSO, OPS, OSP in turn
// 3. On a failed write, the indexes already written are compensated
//
// System components:
//  - Skiplist ordered map
//  - Six permutation indexes
//  - Planner, iterator and stream filters

pub mod codec;
pub mod config;
mod e2e_tests;
pub mod query;
pub mod simulation;
pub mod storage;
#[cfg(test)]
mod testing;
pub mod types;
