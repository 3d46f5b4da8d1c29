//! Error types for git-publish
//!
//! Every failure is fatal to a publish run. [`ErrorKind`] tells callers how
//! far the run got before failing, which decides what (if anything) a
//! re-run will pick up.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing configuration; nothing was touched
    Configuration,
    /// Repository is not in a publishable state; nothing was rewritten
    Precondition,
    /// History between branch and upstream is not a simple chain
    HistoryShape,
    /// A push or provider call failed; earlier entries may already be published
    Mutation,
    /// Local I/O or invariant failure
    Internal,
}

/// Errors produced by git-publish
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or environment
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Remote URL does not point at a supported hosting platform
    #[error("unsupported platform for remote URL: {0}")]
    UnsupportedPlatform(String),

    /// Could not parse a value (remote URL, provider response, ...)
    #[error("parse error: {0}")]
    Parse(String),

    /// HEAD does not point at a branch
    #[error("HEAD is detached; check out one of the main branches to publish")]
    DetachedHead,

    /// Active branch is not one of the configured main branches
    #[error("current branch {branch} must be one of the following branches to publish: {allowed}")]
    NotOnMainBranch {
        /// Active branch name
        branch: String,
        /// Comma-separated list of accepted branch names
        allowed: String,
    },

    /// Active branch has no upstream
    #[error("current branch {0} is not tracking a remote branch")]
    NoTrackingBranch(String),

    /// Upstream moved ahead of the merge-base
    #[error("branch {branch} is not up-to-date with its tracking branch {tracking}")]
    NotUpToDate {
        /// Active branch name
        branch: String,
        /// Tracking branch short name (e.g. `origin/main`)
        tracking: String,
    },

    /// No commits between the branch tip and the merge-base
    #[error("nothing to publish")]
    NothingToPublish,

    /// Merge-base computation did not yield exactly one commit
    #[error("commits {left} and {right} do not have a single common ancestor ({count} found)")]
    AmbiguousAncestor {
        /// First commit
        left: String,
        /// Second commit
        right: String,
        /// Number of merge-bases found
        count: usize,
    },

    /// A merge commit sits in the publish range
    #[error("merge commit {0} cannot be published")]
    MergeCommitRejected(String),

    /// A root commit was reached before the merge-base
    #[error("commit {0} has no parent")]
    RootCommitReached(String),

    /// libgit2 error
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// A `git` subprocess failed
    #[error("`git {command}` failed: {stderr}")]
    GitCommand {
        /// Arguments passed to git
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// Remote refused a force push
    #[error("failed to push branch {branch} to {remote}: {message}")]
    PushRejected {
        /// Branch being pushed
        branch: String,
        /// Remote name
        remote: String,
        /// Reason reported by git
        message: String,
    },

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Octocrab client error
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// GitLab API error
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic provider error
    #[error("platform error: {0}")]
    Platform(String),

    /// A failure after part of the stack was already published
    #[error("{source} (already published: {})", published_list(.published))]
    StackAborted {
        /// Branches pushed and reconciled before the failure
        published: Vec<String>,
        /// Underlying failure
        source: Box<Error>,
    },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

fn published_list(published: &[String]) -> String {
    if published.is_empty() {
        "none".to_string()
    } else {
        published.join(", ")
    }
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Auth(_) | Self::UnsupportedPlatform(_) | Self::Parse(_) => {
                ErrorKind::Configuration
            }
            Self::DetachedHead
            | Self::NotOnMainBranch { .. }
            | Self::NoTrackingBranch(_)
            | Self::NotUpToDate { .. }
            | Self::NothingToPublish => ErrorKind::Precondition,
            Self::AmbiguousAncestor { .. }
            | Self::MergeCommitRejected(_)
            | Self::RootCommitReached(_) => ErrorKind::HistoryShape,
            Self::Git(_)
            | Self::GitCommand { .. }
            | Self::PushRejected { .. }
            | Self::GitHubApi(_)
            | Self::Octocrab(_)
            | Self::GitLabApi(_)
            | Self::Http(_)
            | Self::Platform(_)
            | Self::StackAborted { .. } => ErrorKind::Mutation,
            Self::Io(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
