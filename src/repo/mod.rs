//! Repository access
//!
//! The publish engine only talks to git through the [`Repository`] trait so
//! it can run against an in-memory repository in tests. [`GitRepository`]
//! is the real implementation.

mod git;
mod hook;

pub use git::GitRepository;
pub use hook::{install_commit_msg_hook, HookStatus, COMMIT_MSG_HOOK};

use crate::error::Result;
use crate::types::{CommitInfo, TrackingBranch};

/// Message attached to the stash taken around a publish run
pub const STASH_MESSAGE: &str = "git-publish temporary stash";

/// Version-control operations needed to publish a stack
pub trait Repository {
    /// Name of the checked-out branch, or `None` if HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    /// Upstream of a local branch
    fn tracking_branch(&self, branch: &str) -> Result<Option<TrackingBranch>>;

    /// Commit ID a reference (`refs/...` or short branch name) points to
    fn resolve(&self, reference: &str) -> Result<String>;

    /// All merge-bases of two commits
    fn merge_bases(&self, left: &str, right: &str) -> Result<Vec<String>>;

    /// Read a commit
    fn commit(&self, id: &str) -> Result<CommitInfo>;

    /// Write a copy of `id` with a new message and/or parent list
    ///
    /// Tree, author and committer are carried over. Returns the new commit.
    fn rewrite_commit(
        &self,
        id: &str,
        message: Option<&str>,
        parents: &[String],
    ) -> Result<CommitInfo>;

    /// Create a local branch at `commit`, moving it if it already exists
    fn set_branch(&self, name: &str, commit: &str) -> Result<()>;

    /// Delete a local branch
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// Force-push `refs/heads/<branch>` to the same ref on `remote`
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// URL of a remote
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Fetch all remotes
    fn fetch_all(&self) -> Result<()>;

    /// Whether there are uncommitted changes or untracked files
    fn is_dirty(&self) -> Result<bool>;

    /// Stash everything, including untracked files
    ///
    /// Returns `false` if no stash entry carrying `message` was created.
    fn stash_push(&self, message: &str) -> Result<bool>;

    /// Pop the most recent stash
    fn stash_pop(&self) -> Result<()>;
}
