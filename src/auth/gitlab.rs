//! GitLab authentication

use crate::auth::{resolve_token, AuthConfig, CliToken, ConfigToken, CredentialHelper, TokenSource};
use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;

/// Token sources for GitLab, in priority order
///
/// 1. `GITLAB_TOKEN` / `GL_TOKEN`
/// 2. glab CLI (`glab auth token`)
/// 3. git credential helper for the host
pub fn gitlab_token_sources(config: &Config, host: &str) -> Vec<Box<dyn TokenSource>> {
    vec![
        Box::new(ConfigToken(config.gitlab_token.clone())),
        Box::new(CliToken::new("glab", &["auth", "token", "--hostname", host])),
        Box::new(CredentialHelper::new(host)),
    ]
}

/// Get GitLab authentication
///
/// `host` is `None` for gitlab.com unless `GITLAB_HOST` is configured.
pub async fn get_gitlab_auth(config: &Config, host: Option<&str>) -> Result<AuthConfig> {
    let host = host
        .map(String::from)
        .or_else(|| config.gitlab_host.clone())
        .unwrap_or_else(|| "gitlab.com".to_string());

    let sources = gitlab_token_sources(config, &host);
    let (token, source) = resolve_token(&sources).await.ok_or_else(|| {
        Error::Auth(
            "No GitLab token found. Set GITLAB_TOKEN (or GL_TOKEN), or run `glab auth login`"
                .to_string(),
        )
    })?;

    Ok(AuthConfig {
        token,
        source,
        host,
    })
}

#[derive(Deserialize)]
struct GitLabUser {
    username: String,
}

/// Test GitLab authentication, returning the authenticated username
pub async fn test_gitlab_auth(config: &AuthConfig) -> Result<String> {
    let url = format!("https://{}/api/v4/user", config.host);

    let user: GitLabUser = Client::new()
        .get(&url)
        .header("PRIVATE-TOKEN", &config.token)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?
        .json()
        .await?;

    Ok(user.username)
}
