//! Linear history walker

use crate::error::{Error, Result};
use crate::repo::Repository;
use crate::types::CommitInfo;
use tracing::debug;

/// Find the single merge-base of two commits
///
/// Criss-cross histories with several merge-bases, and unrelated histories
/// with none, are rejected.
pub fn find_common_ancestor(repo: &dyn Repository, left: &str, right: &str) -> Result<CommitInfo> {
    let bases = repo.merge_bases(left, right)?;
    if bases.len() != 1 {
        return Err(Error::AmbiguousAncestor {
            left: left.to_string(),
            right: right.to_string(),
            count: bases.len(),
        });
    }
    let base = repo.commit(&bases[0])?;
    debug!("Merge-base of {left} and {right}: {}", base.id);
    Ok(base)
}

/// Collect the commits from `top` down to, but excluding, `bottom`
///
/// Returned newest first. Empty when `top == bottom`.
pub fn collect_between(repo: &dyn Repository, top: &str, bottom: &str) -> Result<Vec<CommitInfo>> {
    let mut commits = Vec::new();
    let mut current = top.to_string();

    while current != bottom {
        let commit = repo.commit(&current)?;
        let parent = match commit.parents.as_slice() {
            [parent] => parent.clone(),
            [] => return Err(Error::RootCommitReached(commit.id)),
            _ => return Err(Error::MergeCommitRejected(commit.id)),
        };
        debug!("  {} {}", commit.short_id(), commit.summary());
        commits.push(commit);
        current = parent;
    }

    debug!("Collected {} commits above {bottom}", commits.len());
    Ok(commits)
}
