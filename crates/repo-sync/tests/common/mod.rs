//! Shared setup for repo-sync integration tests

#![allow(dead_code)]

use chrono::DateTime;
use repo_sync::{FixedClock, Identity, RepositorySync, SilentProgress, SyncSettings};
use repo_test_utils::SyncFixture;

pub fn identity(name: &str) -> Identity {
    Identity::new(name, format!("{name}@example.com"))
}

/// A quiet sync for working copy `name` against the fixture's remote.
pub fn sync_for(fixture: &SyncFixture, name: &str) -> RepositorySync {
    let settings = SyncSettings::new(identity(name), fixture.work_path(name), fixture.remote_url())
        .with_token("unused-for-local-remotes");
    RepositorySync::new(settings).with_progress(SilentProgress)
}

pub fn fixed_clock(rfc3339: &str) -> FixedClock {
    FixedClock(DateTime::parse_from_rfc3339(rfc3339).unwrap())
}
