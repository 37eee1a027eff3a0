//! Credential providers for remote operations

use git2::{Cred, CredentialType};

/// Number of times libgit2 may ask for credentials during one operation.
///
/// libgit2 re-invokes the credential callback after every rejection, so an
/// unbounded provider spins forever on a bad token.
pub const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Supplies credentials when a transport asks for them.
pub trait AuthProvider: Send + Sync {
    /// Produce credentials for `url`.
    ///
    /// `allowed` lists the credential kinds the transport will accept.
    fn credentials(
        &self,
        url: &str,
        username_from_url: Option<&str>,
        allowed: CredentialType,
    ) -> Result<Cred, git2::Error>;
}

/// HTTP basic authentication: the committer name as username, an access
/// token as password.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AuthProvider for BasicAuth {
    fn credentials(
        &self,
        url: &str,
        _username_from_url: Option<&str>,
        allowed: CredentialType,
    ) -> Result<Cred, git2::Error> {
        if allowed.is_user_pass_plaintext() {
            return Cred::userpass_plaintext(&self.username, &self.password);
        }
        Err(git2::Error::from_str(&format!(
            "basic auth cannot satisfy {allowed:?} credentials for {url}"
        )))
    }
}

/// Wrap a provider in the closure shape `RemoteCallbacks::credentials` wants,
/// giving up after [`MAX_CREDENTIAL_ATTEMPTS`].
pub(crate) fn bounded<'a>(
    provider: &'a dyn AuthProvider,
) -> impl FnMut(&str, Option<&str>, CredentialType) -> Result<Cred, git2::Error> + 'a {
    let mut attempts = 0;
    move |url, username_from_url, allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            tracing::warn!(url = %url, attempts = MAX_CREDENTIAL_ATTEMPTS, "Credentials rejected");
            return Err(git2::Error::new(
                git2::ErrorCode::Auth,
                git2::ErrorClass::Http,
                format!("authentication for {url} rejected after {MAX_CREDENTIAL_ATTEMPTS} attempts"),
            ));
        }
        provider.credentials(url, username_from_url, allowed)
    }
}
