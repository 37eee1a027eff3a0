//! [`SyncFixture`]: a remote plus working copies in one temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// Scratch layout used by sync tests:
///
/// ```text
/// <tmp>/remote.git      bare repository acting as the remote
/// <tmp>/<name>          working copies, created on demand by the code under test
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use repo_test_utils::SyncFixture;
///
/// let fixture = SyncFixture::seeded(&[("README.md", "# hello")]);
/// let work = fixture.work_path("alice");
/// // point a RepositorySync at fixture.remote_url() and `work`
/// fixture.assert_remote_file("README.md", "# hello");
/// ```
pub struct SyncFixture {
    temp_dir: TempDir,
}

impl SyncFixture {
    /// Fixture whose remote has no commits at all.
    pub fn empty() -> Self {
        let fixture = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        git::bare_remote(&fixture.remote_path());
        fixture
    }

    /// Fixture whose remote has one commit containing `files`.
    pub fn seeded(files: &[(&str, &str)]) -> Self {
        let fixture = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        git::seeded_remote(&fixture.remote_path(), files);
        fixture
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn remote_path(&self) -> PathBuf {
        self.root().join("remote.git")
    }

    /// The remote as a URL string accepted by clone.
    pub fn remote_url(&self) -> String {
        self.remote_path().to_string_lossy().into_owned()
    }

    /// Location for a working copy named `name`; not created.
    pub fn work_path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Replace the remote's history with a single unrelated commit.
    pub fn rewrite_remote(&self, files: &[(&str, &str)]) -> git2::Oid {
        let repo = git2::Repository::open_bare(self.remote_path()).unwrap();
        git::commit_files(&repo, files, "Rewritten elsewhere", true)
    }

    /// Add a commit on top of the remote's history.
    pub fn commit_to_remote(&self, files: &[(&str, &str)], message: &str) -> git2::Oid {
        let repo = git2::Repository::open_bare(self.remote_path()).unwrap();
        git::commit_files(&repo, files, message, false)
    }

    /// Assert the remote's HEAD commit has `file` with exactly `content`.
    ///
    /// # Panics
    /// Panics with a descriptive message otherwise.
    pub fn assert_remote_file(&self, file: &str, content: &str) {
        let actual = git::file_at_head(&self.remote_path(), file);
        assert_eq!(
            actual.as_deref(),
            Some(content),
            "Remote file {file} mismatch"
        );
    }

    /// Assert `work/file` exists on disk with exactly `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or differs.
    pub fn assert_work_file(&self, work: &str, file: &str, content: &str) {
        let full_path = self.work_path(work).join(file);
        let actual = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert_eq!(actual, content, "File {} mismatch", full_path.display());
    }

    /// Number of entries directly under `work`.
    pub fn entry_count(&self, work: &str) -> usize {
        fs::read_dir(self.work_path(work))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
