//! GitHub authentication

use crate::auth::{resolve_token, AuthConfig, CliToken, ConfigToken, CredentialHelper, TokenSource};
use crate::config::Config;
use crate::error::{Error, Result};

/// Token sources for GitHub, in priority order
///
/// 1. `GITHUB_TOKEN` / `GH_TOKEN`
/// 2. gh CLI (`gh auth token`)
/// 3. git credential helper for the host
pub fn github_token_sources(config: &Config, host: &str) -> Vec<Box<dyn TokenSource>> {
    let gh = if host == "github.com" {
        CliToken::new("gh", &["auth", "token"])
    } else {
        CliToken::new("gh", &["auth", "token", "--hostname", host])
    };

    vec![
        Box::new(ConfigToken(config.github_token.clone())),
        Box::new(gh),
        Box::new(CredentialHelper::new(host)),
    ]
}

/// Get GitHub authentication
///
/// `host` is `None` for github.com.
pub async fn get_github_auth(config: &Config, host: Option<&str>) -> Result<AuthConfig> {
    let host = host
        .map(String::from)
        .or_else(|| config.github_host.clone())
        .unwrap_or_else(|| "github.com".to_string());

    let sources = github_token_sources(config, &host);
    let (token, source) = resolve_token(&sources).await.ok_or_else(|| {
        Error::Auth(
            "No GitHub token found. Set GITHUB_TOKEN (or GH_TOKEN), or run `gh auth login`"
                .to_string(),
        )
    })?;

    Ok(AuthConfig {
        token,
        source,
        host,
    })
}

/// Test GitHub authentication, returning the authenticated login
pub async fn test_github_auth(config: &AuthConfig) -> Result<String> {
    let mut builder = octocrab::Octocrab::builder().personal_token(config.token.clone());
    if config.host != "github.com" {
        builder = builder
            .base_uri(format!("https://{}/api/v3", config.host))
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
    }
    let octocrab = builder
        .build()
        .map_err(|e| Error::GitHubApi(e.to_string()))?;

    let user = octocrab
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?;

    Ok(user.login)
}
