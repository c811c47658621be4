//! Data types exchanged between the mirror engine and the gateway.
//!
//! - `tree`: FileEntry, BrowsingContext, ResolvedBranch
//! - `commit`: CommitRecord
//! - `mirror`: RemoteRepo, SyncOutcome, SyncReport

pub mod commit;
pub mod mirror;
pub mod tree;

pub use commit::*;
pub use mirror::*;
pub use tree::*;
