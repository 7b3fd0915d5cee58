//! In-memory hexastore storage.
//!
//! Every statement is kept in six permutation indexes (`SPO`, `SOP`, `PSO`,
//! `POS`, `OSP`, `OPS`), each a three-level nest of [`SkipList`]s ending in
//! a map of K-order versions:
//!
//! ```text
//! Store
//!  ├─ Index<Spo>: S → P → O → K → C
//!  ├─ Index<Sop>: S → O → P → K → C
//!  ├─ ...
//!  └─ Index<Ops>: O → P → S → K → C
//! ```
//!
//! A [`Clock`] stamps each write with a strictly increasing [`KOrder`]
//! token, so storing the same triple twice keeps two versions.
//!
//! [`KOrder`]: crate::types::KOrder

mod clock;
mod error;
pub(crate) mod index;
pub(crate) mod skiplist;
mod store;
mod time;

pub use clock::Clock;
pub use error::{AddError, StoreError};
pub use index::{Index, Layout, Levels, Ops, Osp, Permutation, Pos, Pso, Sop, Spo};
pub use skiplist::{DEFAULT_MAX_LEVEL, SkipList};
pub use store::Store;
pub use time::{SystemTimeSource, TimeSource};
