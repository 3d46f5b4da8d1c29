//! Platform detection from remote URLs

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use regex::Regex;
use std::sync::LazyLock;

/// scp-like SSH syntax: `git@host:owner/repo.git`
static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@([^:/]+):/?(.+?)(?:\.git)?/?$").expect("hardcoded regex is valid")
});

/// Detect platform (GitHub or GitLab) from a remote URL
pub fn detect_platform(url: &str, config: &Config) -> Option<Platform> {
    let (hostname, _) = split_remote_url(url)?;
    detect_host(&hostname, config).map(|(platform, _)| platform)
}

/// Platform of a hostname, and whether it is the public instance
///
/// Subdomains of the public hosts (`ssh.github.com`, `altssh.gitlab.com`)
/// serve the same API as the apex domain.
fn detect_host(hostname: &str, config: &Config) -> Option<(Platform, bool)> {
    let is_public = |apex: &str| {
        hostname == apex
            || hostname
                .strip_suffix(apex)
                .is_some_and(|sub| sub.ends_with('.'))
    };

    if is_public("github.com") {
        return Some((Platform::GitHub, true));
    }
    if is_public("gitlab.com") {
        return Some((Platform::GitLab, true));
    }
    if config.github_host.as_deref() == Some(hostname) {
        return Some((Platform::GitHub, false));
    }
    if config.gitlab_host.as_deref() == Some(hostname) {
        return Some((Platform::GitLab, false));
    }

    None
}

/// Parse repository info (owner/repo) from a remote URL
pub fn parse_repo_info(url: &str, config: &Config) -> Result<PlatformConfig> {
    let (hostname, path) =
        split_remote_url(url).ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {url}")))?;
    let (platform, public) = detect_host(&hostname, config)
        .ok_or_else(|| Error::UnsupportedPlatform(url.to_string()))?;

    // Split path into owner and repo (GitLab supports nested groups)
    let (owner, repo) = path
        .rsplit_once('/')
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
        .ok_or_else(|| Error::Parse(format!("invalid repo path: {path}")))?;

    let host = (!public).then_some(hostname);

    Ok(PlatformConfig {
        platform,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host,
    })
}

/// Split a remote URL into (hostname, project path without `.git`)
fn split_remote_url(url: &str) -> Option<(String, String)> {
    if let Some(caps) = SCP_LIKE.captures(url) {
        if !url.contains("://") {
            return Some((caps[1].to_string(), caps[2].to_string()));
        }
    }

    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_string();
    let path = parsed.path().trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() {
        return None;
    }
    Some((host, path.to_string()))
}
