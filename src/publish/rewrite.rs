//! Stack rewriting
//!
//! Gives each commit an identifier, stacks it onto the previously published
//! commit and pushes it to its own branch.

use crate::change_id::ChangeIdCodec;
use crate::error::Result;
use crate::repo::Repository;
use crate::types::CommitInfo;
use tracing::debug;

/// A commit after identifier assignment and re-parenting
#[derive(Debug, Clone)]
pub struct RewrittenCommit {
    /// Change identifier read from, or written to, the message
    pub change_id: String,
    /// Commit ID before rewriting
    pub original_id: String,
    /// The commit as it now exists
    pub commit: CommitInfo,
}

/// Ensure `commit` has an identifier and sits directly on `parent`
///
/// When neither the message nor the parent needs to change the commit is
/// returned as is, so re-running on an already published stack is a no-op.
pub fn rewrite_onto(
    repo: &dyn Repository,
    codec: &ChangeIdCodec,
    commit: &CommitInfo,
    parent: &str,
) -> Result<RewrittenCommit> {
    let (message, change_id, message_changed) = codec.ensure(&commit.message);
    let parent_changed = commit.parents.len() != 1 || commit.parents[0] != parent;

    let rewritten = if message_changed || parent_changed {
        let new_message = message_changed.then_some(message.as_str());
        let rewritten = repo.rewrite_commit(&commit.id, new_message, &[parent.to_string()])?;
        debug!(
            "Rewrote {} -> {} ({change_id})",
            commit.short_id(),
            rewritten.short_id()
        );
        rewritten
    } else {
        debug!("{} unchanged ({change_id})", commit.short_id());
        commit.clone()
    };

    Ok(RewrittenCommit {
        change_id,
        original_id: commit.id.clone(),
        commit: rewritten,
    })
}

/// Point `branch` at `commit` locally and force-push it to `remote`
pub fn push_branch_at(repo: &dyn Repository, remote: &str, branch: &str, commit: &str) -> Result<()> {
    repo.set_branch(branch, commit)?;
    repo.push_branch(remote, branch)?;
    debug!("Pushed {branch} at {commit} to {remote}");
    Ok(())
}
