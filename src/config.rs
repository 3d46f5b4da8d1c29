//! Runtime configuration
//!
//! All environment-driven settings are read once into a [`Config`] which is
//! then passed to whatever needs it. Nothing below the CLI reads the process
//! environment directly.

use std::env;

/// Default trailer prefix
pub const DEFAULT_CHANGE_ID_PREFIX: &str = "Change-Id:";

/// Branch names accepted as the publishing branch by default
pub const DEFAULT_MAIN_BRANCHES: [&str; 4] = ["main", "master", "development", "develop"];

/// Namespace used when no user name can be determined
const FALLBACK_NAMESPACE: &str = "git-publish";

/// git-publish configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix of the change identifier trailer (e.g. `Change-Id:`)
    pub change_id_prefix: String,
    /// Namespace for generated change identifiers
    pub branch_namespace: String,
    /// Branches that may be published from
    pub main_branches: Vec<String>,
    /// Explicit GitHub token (`GITHUB_TOKEN` / `GH_TOKEN`)
    pub github_token: Option<String>,
    /// Explicit GitLab token (`GITLAB_TOKEN` / `GL_TOKEN`)
    pub gitlab_token: Option<String>,
    /// GitHub Enterprise host (`GH_HOST`)
    pub github_host: Option<String>,
    /// Self-hosted GitLab host (`GITLAB_HOST` or `GITLAB_URL`)
    pub gitlab_host: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Build configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let change_id_prefix =
            get("GITPUBLISH_CHANGE_ID_PREFIX").unwrap_or_else(|| DEFAULT_CHANGE_ID_PREFIX.into());

        let branch_namespace = get("GITPUBLISH_BRANCH_PREFIX")
            .or_else(|| get("USER"))
            .or_else(|| get("USERNAME"))
            .unwrap_or_else(|| FALLBACK_NAMESPACE.into());

        let main_branches = get("GITPUBLISH_MAIN_BRANCHES").map_or_else(
            || DEFAULT_MAIN_BRANCHES.iter().map(ToString::to_string).collect(),
            |list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            },
        );

        let gitlab_host = get("GITLAB_HOST").or_else(|| get("GITLAB_URL").map(|u| strip_scheme(&u)));

        Self {
            change_id_prefix,
            branch_namespace,
            main_branches,
            github_token: get("GITHUB_TOKEN").or_else(|| get("GH_TOKEN")),
            gitlab_token: get("GITLAB_TOKEN").or_else(|| get("GL_TOKEN")),
            github_host: get("GH_HOST"),
            gitlab_host,
        }
    }

    /// Whether `branch` may be published from
    pub fn is_main_branch(&self, branch: &str) -> bool {
        self.main_branches.iter().any(|b| b == branch)
    }
}

fn strip_scheme(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme.trim_end_matches('/').to_string()
}
