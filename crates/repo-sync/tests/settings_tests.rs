use pretty_assertions::assert_eq;
use repo_sync::{Error, Identity, SyncSettings};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

const TOML_SETTINGS: &str = r#"
local_path = "/var/lib/notes"
remote_url = "https://example.com/notes.git"
access_token = "inline-token"

[identity]
name = "notes-bot"
email = "bot@example.com"
"#;

#[test]
fn test_load_toml_with_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sync.toml");
    fs::write(&path, TOML_SETTINGS).unwrap();

    let settings = SyncSettings::load(&path).unwrap();

    assert_eq!(settings.identity, Identity::new("notes-bot", "bot@example.com"));
    assert_eq!(settings.local_path, std::path::PathBuf::from("/var/lib/notes"));
    assert_eq!(settings.remote_url, "https://example.com/notes.git");
    assert_eq!(settings.access_token, "inline-token");
    assert_eq!(settings.remote_name, "origin");
}

#[rstest]
#[case("sync.json", r#"{"identity":{"name":"n","email":"e@x"},"local_path":"/w","remote_url":"u","remote_name":"upstream"}"#)]
#[case("sync.yaml", "identity:\n  name: n\n  email: e@x\nlocal_path: /w\nremote_url: u\nremote_name: upstream\n")]
fn test_load_other_formats(#[case] file: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();

    let settings = SyncSettings::load(&path).unwrap();

    assert_eq!(settings.remote_name, "upstream");
    assert!(settings.access_token.is_empty());
}

#[test]
fn test_token_env_reads_environment() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sync.toml");
    let content = TOML_SETTINGS.replace("access_token = \"inline-token\"", "token_env = \"PATH\"");
    fs::write(&path, content).unwrap();

    let settings = SyncSettings::load(&path).unwrap();

    assert_eq!(settings.access_token, std::env::var("PATH").unwrap());
    assert_eq!(settings.token_env, None);
}

#[test]
fn test_token_env_missing_variable() {
    let settings = SyncSettings::new(Identity::new("n", "e@x"), "/w", "u");
    let settings = SyncSettings {
        token_env: Some("REPO_SYNC_TEST_SURELY_UNSET_4F2A".into()),
        ..settings
    };

    let err = settings.resolve_token().unwrap_err();
    assert!(matches!(err, Error::MissingToken { ref var } if var == "REPO_SYNC_TEST_SURELY_UNSET_4F2A"));
}

#[test]
fn test_load_rejects_missing_fields() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sync.toml");
    fs::write(&path, "remote_url = \"u\"\n").unwrap();

    let result = SyncSettings::load(&path);
    assert!(matches!(result, Err(Error::Fs(repo_fs::Error::ConfigParse { .. }))));
}
