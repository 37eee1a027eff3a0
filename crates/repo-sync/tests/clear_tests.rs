mod common;

use common::sync_for;
use repo_sync::Error;
use repo_test_utils::SyncFixture;

#[test]
fn test_clear_empties_working_copy() {
    let fixture = SyncFixture::seeded(&[("README.md", "# hello"), ("notes.txt", "n")]);
    let sync = sync_for(&fixture, "work");
    sync.init().unwrap();
    std::fs::create_dir_all(fixture.work_path("work").join("nested/dir")).unwrap();
    assert!(fixture.entry_count("work") > 0);

    sync.clear().unwrap();

    assert!(fixture.work_path("work").is_dir());
    assert_eq!(fixture.entry_count("work"), 0);
}

#[test]
fn test_clear_missing_directory_is_listing_error() {
    let fixture = SyncFixture::empty();
    let sync = sync_for(&fixture, "never-created");

    let result = sync.clear();

    assert!(
        matches!(result, Err(Error::Fs(repo_fs::Error::Io { .. }))),
        "got {result:?}"
    );
}

#[test]
fn test_pull_after_clear_reclones() {
    let fixture = SyncFixture::seeded(&[("README.md", "# hello")]);
    let sync = sync_for(&fixture, "work");
    sync.init().unwrap();

    sync.clear().unwrap();
    sync.pull().unwrap();

    fixture.assert_work_file("work", "README.md", "# hello");
}
