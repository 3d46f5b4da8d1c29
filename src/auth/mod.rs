//! Authentication for GitHub and GitLab
//!
//! Tokens are looked up, in order, from explicit configuration, the
//! platform CLI (gh, glab) and the git credential helper. Each lookup is a
//! [`TokenSource`]; a source that fails for any reason is skipped.

mod github;
mod gitlab;
mod sources;

pub use github::{get_github_auth, github_token_sources, test_github_auth};
pub use gitlab::{get_gitlab_auth, gitlab_token_sources, test_gitlab_auth};
pub use sources::{CliToken, ConfigToken, CredentialHelper};

use async_trait::async_trait;
use tracing::debug;

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token from CLI tool (gh or glab)
    Cli,
    /// Token from `git credential fill`
    CredentialHelper,
}

/// Resolved credentials for one platform host
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
    /// Host the token is for (e.g., "github.com")
    pub host: String,
}

/// One way of discovering a token
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Kind of source, reported back to the user
    fn kind(&self) -> AuthSource;

    /// Look up a token, `None` if this source has nothing
    async fn token(&self) -> Option<String>;
}

/// Try each source in order and return the first token found
pub async fn resolve_token(sources: &[Box<dyn TokenSource>]) -> Option<(String, AuthSource)> {
    for source in sources {
        match source.token().await {
            Some(token) => {
                debug!("Using token from {:?}", source.kind());
                return Some((token, source.kind()));
            }
            None => debug!("No token from {:?}, trying next source", source.kind()),
        }
    }
    None
}
