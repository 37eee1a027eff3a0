//! Shared test utilities for the repo-sync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: bare remotes, history rewriting and broken working copies
//! - [`repo`]: [`SyncFixture`](repo::SyncFixture), a scratch directory holding
//!   one remote and any number of working copies

pub mod git;
pub mod repo;

pub use repo::SyncFixture;
