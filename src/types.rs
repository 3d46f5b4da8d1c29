//! Core types for git-publish

use serde::{Deserialize, Serialize};

/// A commit as seen by the publish engine
///
/// Commits are values keyed by their hash. Rewriting a commit produces a new
/// `CommitInfo` with a different `id`; the old one is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Git commit ID (hex)
    pub id: String,
    /// Full commit message
    pub message: String,
    /// Parent commit IDs (hex)
    pub parents: Vec<String>,
}

impl CommitInfo {
    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim_end()
    }

    /// Abbreviated commit ID for display
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(7)]
    }
}

/// Upstream of a local branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingBranch {
    /// Remote name (e.g., "origin")
    pub remote: String,
    /// Short name (e.g., "origin/main")
    pub name: String,
    /// Full reference (e.g., "refs/remotes/origin/main")
    pub reference: String,
}

impl TrackingBranch {
    /// Branch name on the remote side (e.g. "main" for "origin/main")
    pub fn remote_branch(&self) -> &str {
        self.name
            .strip_prefix(self.remote.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.name)
    }
}

/// State of a review request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    /// Open for review
    Open,
    /// Closed or merged
    Closed,
}

/// A pull request / merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// PR/MR number
    pub number: u64,
    /// Web URL for the PR/MR
    pub html_url: String,
    /// Source branch name
    pub source_branch: String,
    /// Target branch name
    pub target_branch: String,
    /// PR/MR title
    pub title: String,
    /// Open or closed
    pub state: ReviewState,
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user, organization or nested group path)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com/gitlab.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// `owner/repo` project path
    pub fn namespace(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Host name, falling back to the public instance
    pub fn host_or_default(&self) -> &str {
        self.host.as_deref().unwrap_or(match self.platform {
            Platform::GitHub => "github.com",
            Platform::GitLab => "gitlab.com",
        })
    }
}

/// One published entry of a stack, oldest first
#[derive(Debug, Clone)]
pub struct StackEntry {
    /// Change identifier carried by the commit
    pub change_id: String,
    /// Commit as it was before publishing
    pub original_id: String,
    /// Commit after identifier assignment and re-parenting
    pub rewritten: CommitInfo,
    /// Branch pushed for this entry
    pub branch: String,
    /// Branch the review request targets
    pub target_branch: String,
    /// Review request after reconciliation
    pub review: ReviewRequest,
    /// Whether the review request was created by this run
    pub created: bool,
}
