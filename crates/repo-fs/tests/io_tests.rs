use repo_fs::{Error, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_list_entries_is_shallow_and_sorted() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("b.txt"), "b").unwrap();
    fs::write(temp.path().join("a.txt"), "a").unwrap();
    fs::create_dir_all(temp.path().join("nested/deeper")).unwrap();

    let entries = io::list_entries(temp.path()).unwrap();
    let names: Vec<_> = entries
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["a.txt", "b.txt", "nested"]);
}

#[test]
fn test_list_entries_missing_dir_is_io_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");

    let err = io::list_entries(&missing).unwrap_err();
    assert!(matches!(err, Error::Io { ref path, .. } if path == &missing));
}

#[test]
fn test_clear_dir_removes_files_and_directories() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("file.txt"), "content").unwrap();
    fs::write(root.join(".hidden"), "content").unwrap();
    fs::create_dir_all(root.join(".git/objects/ab")).unwrap();
    fs::write(root.join(".git/objects/ab/cdef"), "blob").unwrap();

    io::clear_dir(root).unwrap();

    assert!(root.exists(), "cleared directory itself must remain");
    assert!(io::list_entries(root).unwrap().is_empty());
}

#[test]
fn test_clear_dir_on_empty_dir_is_noop() {
    let temp = TempDir::new().unwrap();
    io::clear_dir(temp.path()).unwrap();
    assert!(io::list_entries(temp.path()).unwrap().is_empty());
}

#[test]
fn test_clear_dir_missing_dir_returns_listing_error() {
    let temp = TempDir::new().unwrap();
    let result = io::clear_dir(&temp.path().join("nope"));
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[cfg(unix)]
#[test]
fn test_clear_dir_removes_symlink_without_following() {
    let temp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("keep.txt"), "keep").unwrap();

    let target = temp.path().join("work");
    fs::create_dir(&target).unwrap();
    std::os::unix::fs::symlink(outside.path(), target.join("link")).unwrap();

    io::clear_dir(&target).unwrap();

    assert!(io::list_entries(&target).unwrap().is_empty());
    assert!(outside.path().join("keep.txt").exists());
}

#[test]
fn test_read_text_returns_file_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.toml");
    fs::write(&path, "name = \"x\"\n").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "name = \"x\"\n");
}

#[test]
fn test_read_text_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    assert!(io::read_text(&temp.path().join("missing.txt")).is_err());
}
