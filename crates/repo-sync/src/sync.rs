//! The synchronized working copy

use std::path::Path;

use git2::{Oid, Repository};

use crate::auth::{AuthProvider, BasicAuth};
use crate::clock::{Clock, SystemClock};
use crate::commits::{self, CommitInfo};
use crate::helpers::{self, PullOutcome};
use crate::progress::{ProgressSink, StdoutProgress};
use crate::settings::SyncSettings;
use crate::{Error, Result};

/// A local working copy kept in sync with one remote.
///
/// Construction does no I/O. Call [`init`](Self::init) once to obtain a
/// usable working copy, then [`pull`](Self::pull) and [`push`](Self::push)
/// as often as needed. Operations block until git finishes and must not run
/// concurrently against the same `local_path`.
pub struct RepositorySync {
    settings: SyncSettings,
    auth: Box<dyn AuthProvider>,
    clock: Box<dyn Clock>,
    progress: Box<dyn ProgressSink>,
}

impl RepositorySync {
    /// Basic auth with the identity name and access token, wall-clock commit
    /// times, progress on stdout.
    pub fn new(settings: SyncSettings) -> Self {
        let auth = BasicAuth::new(settings.identity.name.clone(), settings.access_token.clone());
        Self {
            settings,
            auth: Box::new(auth),
            clock: Box::new(SystemClock),
            progress: Box::new(StdoutProgress::default()),
        }
    }

    pub fn with_auth(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Box::new(auth);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn local_path(&self) -> &Path {
        &self.settings.local_path
    }

    /// Bring the working copy into a usable state.
    ///
    /// Pulls once. If that fails the local directory is wiped and the pull
    /// retried a single time; the retry's result is final. A working copy
    /// with uncommitted changes is never wiped: that failure is returned as
    /// is.
    pub fn init(&self) -> Result<PullOutcome> {
        let first_err = match self.pull() {
            Ok(outcome) => return Ok(outcome),
            Err(e @ Error::UncommittedChanges { .. }) => return Err(e),
            Err(e) => e,
        };

        tracing::warn!(
            path = %self.local_path().display(),
            error = %first_err,
            "Initial pull failed, clearing working copy and re-cloning"
        );

        // A missing directory is fine here; the clone below creates it.
        if let Err(clear_err) = self.clear() {
            tracing::warn!(
                path = %self.local_path().display(),
                error = %clear_err,
                "Could not fully clear working copy"
            );
        }

        self.pull()
    }

    /// Open (or clone) the working copy, fetch the remote and fast-forward
    /// the current branch.
    pub fn pull(&self) -> Result<PullOutcome> {
        let repo = self.repository()?;
        let branch = helpers::current_branch(&repo)?;

        helpers::fetch(
            &repo,
            &self.settings.remote_name,
            self.auth.as_ref(),
            self.progress.as_ref(),
        )?;
        let outcome = helpers::fast_forward(&repo, &self.settings.remote_name, &branch)?;

        tracing::debug!(%branch, ?outcome, "Pull finished");
        Ok(outcome)
    }

    /// Stage everything, commit with a timestamp message and force-push.
    ///
    /// Returns the id of the new commit. A failed push leaves that commit in
    /// place locally.
    pub fn push(&self) -> Result<Oid> {
        let repo = self.repository()?;
        let branch = helpers::current_branch(&repo)?;

        let mut index = helpers::stage_all(&repo)?;
        let now = self.clock.now();
        let oid = helpers::commit_index(&repo, &mut index, &self.settings.identity, &now)?;
        tracing::debug!(%branch, commit = %oid, "Committed local changes");

        helpers::force_push(
            &repo,
            &self.settings.remote_name,
            &branch,
            self.auth.as_ref(),
            self.progress.as_ref(),
        )?;

        Ok(oid)
    }

    /// Remove every entry under `local_path`, keeping the directory itself.
    pub fn clear(&self) -> Result<()> {
        repo_fs::io::clear_dir(self.local_path())?;
        tracing::debug!(path = %self.local_path().display(), "Cleared working copy");
        Ok(())
    }

    /// Up to `max_count` commits from HEAD, newest first.
    ///
    /// Reads the existing working copy only; never clones.
    pub fn recent_commits(&self, max_count: usize) -> Result<Vec<CommitInfo>> {
        let repo = Repository::open(self.local_path())?;
        commits::list_recent_commits(&repo, max_count)
    }

    fn repository(&self) -> Result<Repository> {
        helpers::open_or_clone(&self.settings, self.auth.as_ref(), self.progress.as_ref())
    }
}

impl std::fmt::Debug for RepositorySync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositorySync")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
