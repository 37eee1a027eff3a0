//! Time source for commit messages and signatures

use chrono::{DateTime, FixedOffset, Local};

/// Format of the message attached to every pushed commit.
pub const COMMIT_MESSAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Render `now` as a commit message, e.g. `2024-03-01T09:15:00`.
pub fn commit_message(now: &DateTime<FixedOffset>) -> String {
    now.format(COMMIT_MESSAGE_FORMAT).to_string()
}

/// Convert to the timestamp stored in a git signature, keeping the offset.
pub fn signature_time(now: &DateTime<FixedOffset>) -> git2::Time {
    let offset_minutes = now.offset().local_minus_utc() / 60;
    git2::Time::new(now.timestamp(), offset_minutes)
}
