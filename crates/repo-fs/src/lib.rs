//! Filesystem helpers for repo-sync
//!
//! Directory clearing for working-copy recovery, text reads and
//! format-agnostic configuration loading.

pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, RemovalFailure, Result};
