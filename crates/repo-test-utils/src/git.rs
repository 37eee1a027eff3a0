//! Git repository fixtures built directly with `git2`.
//!
//! Remotes are bare repositories on the local filesystem, so clone, fetch
//! and push run without a network or the `git` CLI.

use std::fs;
use std::path::Path;

use git2::{Oid, Repository, Signature};

fn fixture_signature() -> Signature<'static> {
    Signature::now("Fixture", "fixture@example.com")
        .unwrap_or_else(|e| panic!("fixture_signature: {e}"))
}

fn fail<T>(e: git2::Error) -> T {
    panic!("commit_files: {e}")
}

/// Creates a `.git` directory that looks like a repository but has no object
/// store, plus a stray file next to it.
///
/// Realism level: **FAKE**. Enough to defeat a clone into the directory,
/// not enough for `Repository::open`.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn corrupt_working_copy(path: &Path) {
    fs::create_dir_all(path.join(".git/refs/heads"))
        .unwrap_or_else(|e| panic!("corrupt_working_copy: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("corrupt_working_copy: failed to write HEAD: {e}"));
    fs::write(path.join("stray.txt"), "not tracked by anything")
        .unwrap_or_else(|e| panic!("corrupt_working_copy: failed to write stray file: {e}"));
}

/// Initialises an empty bare repository to act as a remote.
///
/// # Panics
/// Panics if `git2::Repository::init_bare` fails.
pub fn bare_remote(path: &Path) -> Repository {
    Repository::init_bare(path).unwrap_or_else(|e| {
        panic!(
            "bare_remote: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Writes `files` as the full tree of a new commit on the branch HEAD names.
///
/// With `orphan` the commit has no parents and the branch is moved to it
/// unconditionally, discarding the previous history.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str, orphan: bool) -> Oid {
    let mut builder = repo.treebuilder(None).unwrap_or_else(fail);
    for (name, content) in files {
        let blob = repo.blob(content.as_bytes()).unwrap_or_else(fail);
        builder
            .insert(*name, blob, 0o100644)
            .unwrap_or_else(fail);
    }
    let tree_id = builder.write().unwrap_or_else(fail);
    let tree = repo.find_tree(tree_id).unwrap_or_else(fail);

    let branch = repo
        .find_reference("HEAD")
        .ok()
        .and_then(|head| head.symbolic_target().map(str::to_string))
        .unwrap_or_else(|| "refs/heads/main".to_string());

    let parent = if orphan {
        None
    } else {
        repo.find_reference(&branch)
            .ok()
            .and_then(|r| r.peel_to_commit().ok())
    };
    let parents: Vec<_> = parent.iter().collect();

    let sig = fixture_signature();
    let oid = repo
        .commit(None, &sig, &sig, message, &tree, &parents)
        .unwrap_or_else(fail);
    repo.reference(&branch, oid, true, message)
        .unwrap_or_else(fail);
    oid
}

/// Bare remote with one commit containing `files`.
pub fn seeded_remote(path: &Path, files: &[(&str, &str)]) -> Repository {
    let repo = bare_remote(path);
    commit_files(&repo, files, "Initial commit", false);
    repo
}

/// Content of `file` in the HEAD commit of the repository at `path`.
///
/// Returns `None` if HEAD is unborn or the file is absent.
pub fn file_at_head(path: &Path, file: &str) -> Option<String> {
    let repo = Repository::open(path).ok()?;
    let tree = repo.head().ok()?.peel_to_tree().ok()?;
    let entry = tree.get_path(Path::new(file)).ok()?;
    let blob = repo.find_blob(entry.id()).ok()?;
    Some(String::from_utf8_lossy(blob.content()).into_owned())
}

/// Full message of the HEAD commit of the repository at `path`.
///
/// # Panics
/// Panics if the repository has no HEAD commit.
pub fn head_message(path: &Path) -> String {
    let repo = Repository::open(path).unwrap_or_else(|e| panic!("head_message: {e}"));
    let commit = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .unwrap_or_else(|e| panic!("head_message: {e}"));
    commit.message().unwrap_or("").to_string()
}

/// A valid working copy with one commit and no remotes.
///
/// # Panics
/// Panics if any git operation fails.
pub fn unrelated_repo(path: &Path) -> Repository {
    let repo = Repository::init(path).unwrap_or_else(|e| panic!("unrelated_repo: {e}"));
    fs::write(path.join("unrelated.txt"), "elsewhere")
        .unwrap_or_else(|e| panic!("unrelated_repo: {e}"));
    {
        let mut index = repo.index().unwrap_or_else(|e| panic!("unrelated_repo: {e}"));
        index
            .add_path(Path::new("unrelated.txt"))
            .unwrap_or_else(|e| panic!("unrelated_repo: {e}"));
        index.write().unwrap_or_else(|e| panic!("unrelated_repo: {e}"));
        let tree_id = index
            .write_tree()
            .unwrap_or_else(|e| panic!("unrelated_repo: {e}"));
        let tree = repo
            .find_tree(tree_id)
            .unwrap_or_else(|e| panic!("unrelated_repo: {e}"));
        let sig = fixture_signature();
        repo.commit(Some("HEAD"), &sig, &sig, "Unrelated", &tree, &[])
            .unwrap_or_else(|e| panic!("unrelated_repo: {e}"));
    }
    repo
}
