//! Mirror engine: locks, storage, branch resolution, sync, browsing, diffs.
//!
//! - `locks`: per-repository exclusive gates
//! - `repository`: `MirrorStore`, the on-disk set of mirrors
//! - `branch`: short branch name resolution and checkout
//! - `sync`: clone / fetch / fast-forward reconciliation
//! - `context`: branch, file and commit listings for a checkout
//! - `diff`: unified diff of a commit against its first parent

pub mod branch;
pub mod context;
pub mod diff;
pub mod locks;
pub mod repository;
pub mod sync;

pub use context::Browse;
pub use locks::LockRegistry;
pub use repository::{MirrorStore, SharedStore};
