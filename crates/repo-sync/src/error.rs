//! Error types for repo-sync

use std::path::PathBuf;

/// Result type for repo-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in repo-sync operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] repo_fs::Error),

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Remote '{name}' points at {actual}, expected {expected}")]
    RemoteMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Repository at {path} has no working tree")]
    BareRepository { path: PathBuf },

    #[error("HEAD of {path} is detached; a branch is required")]
    DetachedHead { path: PathBuf },

    #[error("Cannot fast-forward {branch} from {local} to {remote}. Manual merge required.")]
    NonFastForward {
        branch: String,
        local: git2::Oid,
        remote: git2::Oid,
    },

    #[error("Working copy at {path} has uncommitted changes: {}", .files.join(", "))]
    UncommittedChanges { path: PathBuf, files: Vec<String> },

    #[error("Push of {reference} rejected: {message}")]
    PushRejected { reference: String, message: String },

    #[error("Access token variable {var} is not set")]
    MissingToken { var: String },
}
