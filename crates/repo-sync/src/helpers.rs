//! git2 building blocks for resolving, pulling and publishing a working copy
//!
//! Each function does one git step; [`RepositorySync`](crate::RepositorySync)
//! sequences them.

use std::cell::RefCell;

use chrono::{DateTime, FixedOffset};
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    Commit, ErrorCode, FetchOptions, IndexAddOption, Oid, PushOptions, RemoteCallbacks, Repository,
    Signature, Status, StatusOptions,
};

use crate::auth::{self, AuthProvider};
use crate::clock;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::settings::{Identity, SyncSettings};
use crate::{Error, Result};

/// Result of a successful pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Nothing new on the remote (or the remote has no matching branch yet).
    AlreadyUpToDate,
    /// The local branch moved to the remote commit.
    FastForwarded { from: Option<Oid>, to: Oid },
}

impl PullOutcome {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::AlreadyUpToDate)
    }
}

/// Callbacks shared by clone, fetch and push: credentials and progress.
pub fn remote_callbacks<'a>(
    auth: &'a dyn AuthProvider,
    progress: &'a dyn ProgressSink,
) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(auth::bounded(auth));
    callbacks.sideband_progress(move |text| {
        progress.report(ProgressEvent::Remote(text));
        true
    });
    callbacks.transfer_progress(move |stats| {
        progress.report(ProgressEvent::Fetch {
            received: stats.received_objects(),
            total: stats.total_objects(),
            bytes: stats.received_bytes(),
        });
        true
    });
    callbacks.push_transfer_progress(move |current, total, bytes| {
        progress.report(ProgressEvent::Push {
            current,
            total,
            bytes,
        });
    });
    callbacks
}

/// Open the working copy at `local_path`, cloning the remote if none exists.
///
/// An existing repository must have a working tree and a remote named
/// `remote_name` pointing at `remote_url`.
pub fn open_or_clone(
    settings: &SyncSettings,
    auth: &dyn AuthProvider,
    progress: &dyn ProgressSink,
) -> Result<Repository> {
    let path = settings.local_path.as_path();

    let repo = match Repository::open(path) {
        Ok(repo) => {
            tracing::debug!(path = %path.display(), "Opened existing repository");
            verify_remote(&repo, settings)?;
            repo
        }
        Err(open_err) => {
            tracing::debug!(
                path = %path.display(),
                error = %open_err,
                "No usable repository, cloning"
            );
            clone(settings, auth, progress)?
        }
    };

    if repo.workdir().is_none() {
        return Err(Error::BareRepository {
            path: path.to_path_buf(),
        });
    }

    Ok(repo)
}

fn clone(
    settings: &SyncSettings,
    auth: &dyn AuthProvider,
    progress: &dyn ProgressSink,
) -> Result<Repository> {
    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(remote_callbacks(auth, progress));

    let remote_name = settings.remote_name.clone();
    let repo = RepoBuilder::new()
        .fetch_options(fetch_opts)
        .remote_create(move |repo, _default_name, url| repo.remote(&remote_name, url))
        .clone(&settings.remote_url, &settings.local_path)?;

    tracing::info!(
        path = %settings.local_path.display(),
        remote = %settings.remote_name,
        url = %settings.remote_url,
        "Cloned repository"
    );
    Ok(repo)
}

fn verify_remote(repo: &Repository, settings: &SyncSettings) -> Result<()> {
    let remote = repo
        .find_remote(&settings.remote_name)
        .map_err(|_| Error::RemoteNotFound {
            name: settings.remote_name.clone(),
        })?;

    let actual = remote.url().unwrap_or_default();
    if actual != settings.remote_url {
        return Err(Error::RemoteMismatch {
            name: settings.remote_name.clone(),
            expected: settings.remote_url.clone(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Name of the branch HEAD points at, born or not.
pub fn current_branch(repo: &Repository) -> Result<String> {
    let head = repo.find_reference("HEAD")?;
    match head.symbolic_target() {
        Some(target) => Ok(target
            .strip_prefix("refs/heads/")
            .unwrap_or(target)
            .to_string()),
        None => Err(Error::DetachedHead {
            path: repo.path().to_path_buf(),
        }),
    }
}

/// Fetch `remote_name` using its configured refspecs.
pub fn fetch(
    repo: &Repository,
    remote_name: &str,
    auth: &dyn AuthProvider,
    progress: &dyn ProgressSink,
) -> Result<()> {
    let mut remote = repo
        .find_remote(remote_name)
        .map_err(|_| Error::RemoteNotFound {
            name: remote_name.to_string(),
        })?;

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(remote_callbacks(auth, progress));
    remote.fetch::<&str>(&[], Some(&mut fetch_opts), None)?;

    Ok(())
}

/// Tracked paths with staged or unstaged modifications.
///
/// Untracked and ignored files are not reported.
pub fn uncommitted_changes(repo: &Repository) -> Result<Vec<String>> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(false)
        .include_ignored(false)
        .exclude_submodules(true);

    let statuses = repo.statuses(Some(&mut opts))?;
    Ok(statuses
        .iter()
        .filter(|entry| {
            let status = entry.status();
            status != Status::CURRENT && !status.intersects(Status::WT_NEW | Status::IGNORED)
        })
        .filter_map(|entry| entry.path().map(str::to_string))
        .collect())
}

fn ensure_clean(repo: &Repository) -> Result<()> {
    let files = uncommitted_changes(repo)?;
    if files.is_empty() {
        return Ok(());
    }
    Err(Error::UncommittedChanges {
        path: repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf(),
        files,
    })
}

/// Fast-forward `branch` to its remote-tracking counterpart.
///
/// The working tree is only touched when the branch actually moves. Moving
/// it requires a clean tree (untracked files excepted) and the checkout
/// never overwrites local content; the branch ref is updated after the
/// checkout succeeds.
pub fn fast_forward(repo: &Repository, remote_name: &str, branch: &str) -> Result<PullOutcome> {
    let tracking = format!("refs/remotes/{remote_name}/{branch}");
    let remote_commit = match repo.find_reference(&tracking) {
        Ok(reference) => reference.peel_to_commit()?,
        Err(e) if e.code() == ErrorCode::NotFound => {
            tracing::debug!(%tracking, "Remote branch does not exist yet");
            return Ok(PullOutcome::AlreadyUpToDate);
        }
        Err(e) => return Err(e.into()),
    };
    let target = remote_commit.id();

    let refname = format!("refs/heads/{branch}");
    let mut local = match repo.find_reference(&refname) {
        Ok(reference) => reference,
        Err(e) if e.code() == ErrorCode::NotFound => {
            ensure_clean(repo)?;
            repo.checkout_tree(remote_commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
            repo.reference(&refname, target, false, &format!("pull: create {branch} at {target}"))?;
            repo.set_head(&refname)?;
            tracing::info!(%branch, to = %target, "Checked out remote branch");
            return Ok(PullOutcome::FastForwarded {
                from: None,
                to: target,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let annotated = repo.find_annotated_commit(target)?;
    let (analysis, _) = repo.merge_analysis(&[&annotated])?;

    if analysis.is_up_to_date() {
        return Ok(PullOutcome::AlreadyUpToDate);
    }

    let head_commit = local.peel_to_commit()?.id();
    if analysis.is_fast_forward() {
        ensure_clean(repo)?;
        repo.checkout_tree(remote_commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
        local.set_target(target, &format!("pull: fast-forward to {target}"))?;
        tracing::info!(%branch, from = %head_commit, to = %target, "Fast-forwarded");
        return Ok(PullOutcome::FastForwarded {
            from: Some(head_commit),
            to: target,
        });
    }

    Err(Error::NonFastForward {
        branch: branch.to_string(),
        local: head_commit,
        remote: target,
    })
}

/// Stage every change in the working tree: new and modified files through
/// `add_all`, deletions of tracked files through `update_all`.
pub fn stage_all(repo: &Repository) -> Result<git2::Index> {
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"].iter(), None)?;
    index.write()?;
    Ok(index)
}

/// Commit the index on top of HEAD (or as a root commit on an unborn branch).
pub fn commit_index(
    repo: &Repository,
    index: &mut git2::Index,
    identity: &Identity,
    now: &DateTime<FixedOffset>,
) -> Result<Oid> {
    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = Signature::new(&identity.name, &identity.email, &clock::signature_time(now))?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
        Err(e) => return Err(e.into()),
    };
    let parents: Vec<&Commit<'_>> = parent.iter().collect();

    let oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        &clock::commit_message(now),
        &tree,
        &parents,
    )?;
    Ok(oid)
}

/// Push `branch` to `remote_name`, overwriting whatever the remote has.
pub fn force_push(
    repo: &Repository,
    remote_name: &str,
    branch: &str,
    auth: &dyn AuthProvider,
    progress: &dyn ProgressSink,
) -> Result<()> {
    let mut remote = repo
        .find_remote(remote_name)
        .map_err(|_| Error::RemoteNotFound {
            name: remote_name.to_string(),
        })?;

    let refspec = format!("+refs/heads/{branch}:refs/heads/{branch}");
    let rejection: RefCell<Option<(String, String)>> = RefCell::new(None);

    {
        let mut callbacks = remote_callbacks(auth, progress);
        callbacks.push_update_reference(|reference, status| {
            if let Some(message) = status {
                *rejection.borrow_mut() = Some((reference.to_string(), message.to_string()));
            }
            Ok(())
        });

        let mut push_opts = PushOptions::new();
        push_opts.remote_callbacks(callbacks);
        remote.push(&[refspec.as_str()], Some(&mut push_opts))?;
    }

    if let Some((reference, message)) = rejection.into_inner() {
        return Err(Error::PushRejected { reference, message });
    }

    tracing::info!(remote = %remote_name, %branch, "Force-pushed");
    Ok(())
}
