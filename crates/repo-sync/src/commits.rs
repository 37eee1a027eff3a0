//! Recent commit history of a working copy.

use chrono::{DateTime, FixedOffset, TimeZone};
use git2::{ErrorCode, Repository};

use crate::Result;

/// Information about a single commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Short commit hash (7 characters)
    pub hash: String,

    /// First line of the commit message
    pub message: String,

    /// Commit author name
    pub author: String,

    /// Author timestamp in the author's own offset
    pub timestamp: DateTime<FixedOffset>,
}

/// The last `max_count` commits reachable from HEAD, most recent first.
///
/// An unborn HEAD (fresh clone of an empty remote) has no history.
pub fn list_recent_commits(repo: &Repository, max_count: usize) -> Result<Vec<CommitInfo>> {
    let head = match repo.head() {
        Ok(head) => head.peel_to_commit()?,
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut revwalk = repo.revwalk()?;
    revwalk.push(head.id())?;
    revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

    let mut commits = Vec::with_capacity(max_count);
    for oid in revwalk.take(max_count) {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        let author = commit.author();

        let when = author.when();
        let timestamp = FixedOffset::east_opt(when.offset_minutes() * 60)
            .and_then(|offset| offset.timestamp_opt(when.seconds(), 0).single())
            .unwrap_or_default();

        commits.push(CommitInfo {
            hash: format!("{:.7}", oid),
            message: commit.summary().unwrap_or("").to_string(),
            author: author.name().unwrap_or("Unknown").to_string(),
            timestamp,
        });
    }

    Ok(commits)
}
