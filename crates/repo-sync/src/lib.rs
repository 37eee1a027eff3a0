//! Keep a local working copy in sync with a remote git repository
//!
//! [`RepositorySync`] clones or opens a working copy, pulls with
//! fast-forward, and publishes local changes as a timestamped commit that is
//! force-pushed to the remote. A failed initial pull is recovered by wiping
//! the directory and cloning again.
//!
//! ```no_run
//! use repo_sync::{Identity, RepositorySync, SyncSettings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SyncSettings::new(
//!     Identity::new("notes-bot", "bot@example.com"),
//!     "/var/lib/notes",
//!     "https://example.com/notes.git",
//! )
//! .with_token("secret");
//!
//! let sync = RepositorySync::new(settings);
//! sync.init()?;
//! std::fs::write("/var/lib/notes/today.md", "hello")?;
//! sync.push()?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod clock;
pub mod commits;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod progress;
pub mod settings;
pub mod sync;

pub use auth::{AuthProvider, BasicAuth};
pub use clock::{Clock, FixedClock, SystemClock};
pub use commits::CommitInfo;
pub use error::{Error, Result};
pub use helpers::PullOutcome;
pub use progress::{ProgressEvent, ProgressSink, SilentProgress, StdoutProgress};
pub use settings::{Identity, SyncSettings};
pub use sync::RepositorySync;
