//! Multi-copy scenarios: several RepositorySync instances sharing one remote.

use pretty_assertions::assert_eq;
use repo_sync::{Error, Identity, PullOutcome, RepositorySync, SilentProgress, SyncSettings};
use repo_test_utils::{SyncFixture, git};
use std::fs;

fn copy(fixture: &SyncFixture, name: &str) -> RepositorySync {
    let settings = SyncSettings::new(
        Identity::new(name, format!("{name}@example.com")),
        fixture.work_path(name),
        fixture.remote_url(),
    );
    RepositorySync::new(settings).with_progress(SilentProgress)
}

#[test]
fn alternating_writers_see_each_others_changes() {
    let fixture = SyncFixture::seeded(&[("journal.md", "start\n")]);
    let alice = copy(&fixture, "alice");
    let bob = copy(&fixture, "bob");
    alice.init().unwrap();
    bob.init().unwrap();

    let mut expected = String::from("start\n");
    for round in 0..4 {
        let (writer, writer_name, reader, reader_name) = if round % 2 == 0 {
            (&alice, "alice", &bob, "bob")
        } else {
            (&bob, "bob", &alice, "alice")
        };

        writer.pull().unwrap();
        expected.push_str(&format!("{writer_name} round {round}\n"));
        fs::write(fixture.work_path(writer_name).join("journal.md"), &expected).unwrap();
        writer.push().unwrap();

        assert!(matches!(reader.pull().unwrap(), PullOutcome::FastForwarded { .. }));
        fixture.assert_work_file(reader_name, "journal.md", &expected);
    }

    assert_eq!(alice.recent_commits(10).unwrap().len(), 5);
}

#[test]
fn force_push_wins_and_loser_recovers_through_init() {
    let fixture = SyncFixture::seeded(&[("README.md", "# shared")]);
    let alice = copy(&fixture, "alice");
    let bob = copy(&fixture, "bob");
    alice.init().unwrap();
    bob.init().unwrap();

    fs::write(fixture.work_path("bob").join("bob.txt"), "bob").unwrap();
    bob.push().unwrap();

    // alice never pulled bob's commit; her push replaces it
    fs::write(fixture.work_path("alice").join("alice.txt"), "alice").unwrap();
    alice.push().unwrap();

    fixture.assert_remote_file("alice.txt", "alice");
    assert_eq!(git::file_at_head(&fixture.remote_path(), "bob.txt"), None);

    assert!(matches!(bob.pull(), Err(Error::NonFastForward { .. })));

    bob.init().unwrap();
    fixture.assert_work_file("bob", "alice.txt", "alice");
    assert!(!fixture.work_path("bob").join("bob.txt").exists());
}

#[test]
fn fresh_instances_agree_on_the_same_working_copy() {
    let fixture = SyncFixture::empty();

    copy(&fixture, "shared").init().unwrap();
    fs::write(fixture.work_path("shared").join("a.txt"), "a").unwrap();
    copy(&fixture, "shared").push().unwrap();

    let reopened = copy(&fixture, "shared");
    assert_eq!(reopened.init().unwrap(), PullOutcome::AlreadyUpToDate);
    assert_eq!(repo_fs::io::list_entries(&fixture.work_path("shared")).unwrap().len(), 2);
}
