//! Connection settings for a synchronized working copy

use std::fmt;
use std::path::{Path, PathBuf};

use repo_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Remote label used when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";

/// Commit author and committer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Everything a [`RepositorySync`](crate::RepositorySync) needs to reach its remote.
///
/// Loadable from TOML, JSON or YAML:
///
/// ```toml
/// local_path = "/var/lib/notes"
/// remote_url = "https://example.com/notes.git"
/// token_env = "NOTES_TOKEN"
///
/// [identity]
/// name = "notes-bot"
/// email = "bot@example.com"
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub identity: Identity,
    pub local_path: PathBuf,
    pub remote_url: String,

    /// Basic-auth password sent alongside `identity.name`.
    #[serde(default)]
    pub access_token: String,

    /// Environment variable to read the token from instead of `access_token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    #[serde(default = "default_remote")]
    pub remote_name: String,
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

impl SyncSettings {
    pub fn new(identity: Identity, local_path: impl Into<PathBuf>, remote_url: impl Into<String>) -> Self {
        Self {
            identity,
            local_path: local_path.into(),
            remote_url: remote_url.into(),
            access_token: String::new(),
            token_env: None,
            remote_name: default_remote(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    pub fn with_remote_name(mut self, name: impl Into<String>) -> Self {
        self.remote_name = name.into();
        self
    }

    /// Load settings from a config file and resolve the access token.
    pub fn load(path: &Path) -> Result<Self> {
        let settings: Self = ConfigStore::new().load(path)?;
        settings.resolve_token()
    }

    /// Replace `access_token` with the value of `token_env`, if one is named.
    pub fn resolve_token(mut self) -> Result<Self> {
        if let Some(var) = self.token_env.take() {
            self.access_token = std::env::var(&var).map_err(|_| Error::MissingToken { var })?;
        }
        Ok(self)
    }
}

impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.access_token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("SyncSettings")
            .field("identity", &self.identity)
            .field("local_path", &self.local_path)
            .field("remote_url", &self.remote_url)
            .field("access_token", &token)
            .field("token_env", &self.token_env)
            .field("remote_name", &self.remote_name)
            .finish()
    }
}
