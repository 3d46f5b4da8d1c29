//! Publish execution
//!
//! Runs the whole stack: stash, walk, then for each commit (oldest first)
//! rewrite, push and reconcile, and finally move the local branch onto the
//! rewritten tip.
//!
//! A failure part-way leaves the entries published so far on the remote,
//! but the local branch is only moved once every entry went through.

use crate::change_id::ChangeIdCodec;
use crate::error::{Error, Result};
use crate::graph::{collect_between, find_common_ancestor};
use crate::platform::PlatformService;
use crate::publish::prepare::PublishTarget;
use crate::publish::reconcile::reconcile_review;
use crate::publish::rewrite::{push_branch_at, rewrite_onto};
use crate::publish::{Phase, ProgressCallback, PushStatus};
use crate::repo::{Repository, STASH_MESSAGE};
use crate::types::{CommitInfo, StackEntry};
use tracing::{debug, info, warn};

/// Result of a publish run
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// Local branch that now points at the rewritten tip
    pub branch: String,
    /// Published entries, oldest first
    pub entries: Vec<StackEntry>,
    /// Whether local changes were stashed (and restored) around the run
    pub stashed: bool,
}

impl PublishResult {
    /// Entries whose review request was created by this run
    pub fn created(&self) -> impl Iterator<Item = &StackEntry> {
        self.entries.iter().filter(|e| e.created)
    }

    /// Entries whose existing review request was updated
    pub fn updated(&self) -> impl Iterator<Item = &StackEntry> {
        self.entries.iter().filter(|e| !e.created)
    }
}

/// Options for a publish run
#[derive(Debug, Clone, Copy)]
pub struct PublishOptions {
    /// Fetch all remotes before walking history
    pub fetch: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self { fetch: true }
    }
}

/// Publish every commit between `target.branch` and its upstream
///
/// Local changes are stashed for the duration of the run and restored on
/// every exit path.
pub async fn publish_stack(
    repo: &dyn Repository,
    platform: &dyn PlatformService,
    target: &PublishTarget,
    codec: &ChangeIdCodec,
    options: PublishOptions,
    progress: &dyn ProgressCallback,
) -> Result<PublishResult> {
    progress.on_phase(Phase::Preparing).await;

    let stashed = repo.is_dirty()? && repo.stash_push(STASH_MESSAGE)?;
    if stashed {
        progress.on_message("Stashed local changes").await;
    }

    let outcome = publish_stashed(repo, platform, target, codec, options, progress).await;

    if stashed {
        match repo.stash_pop() {
            Ok(()) => progress.on_message("Restored local changes").await,
            Err(e) if outcome.is_ok() => return Err(e),
            Err(e) => warn!("Failed to restore stash \"{STASH_MESSAGE}\": {e}"),
        }
    }

    outcome.map(|(branch, entries)| PublishResult {
        branch,
        entries,
        stashed,
    })
}

async fn publish_stashed(
    repo: &dyn Repository,
    platform: &dyn PlatformService,
    target: &PublishTarget,
    codec: &ChangeIdCodec,
    options: PublishOptions,
    progress: &dyn ProgressCallback,
) -> Result<(String, Vec<StackEntry>)> {
    if options.fetch {
        repo.fetch_all()?;
    }

    progress.on_phase(Phase::Walking).await;
    let (ancestor, commits) = walk_stack(repo, target)?;
    progress
        .on_message(&format!(
            "Publishing {} commit{} on top of {}",
            commits.len(),
            if commits.len() == 1 { "" } else { "s" },
            target.tracking.name
        ))
        .await;

    progress.on_phase(Phase::Publishing).await;
    let mut entries: Vec<StackEntry> = Vec::with_capacity(commits.len());
    let mut previous_branch = target.tracking.remote_branch().to_string();
    let mut previous_commit = ancestor.id;

    for commit in commits.iter().rev() {
        let entry = match publish_entry(
            repo,
            platform,
            target,
            codec,
            commit,
            &previous_branch,
            &previous_commit,
            progress,
        )
        .await
        {
            Ok(entry) => entry,
            Err(source) => {
                return Err(Error::StackAborted {
                    published: entries.iter().map(|e| e.branch.clone()).collect(),
                    source: Box::new(source),
                });
            }
        };

        progress.on_entry_published(&entry).await;
        previous_branch.clone_from(&entry.branch);
        previous_commit.clone_from(&entry.rewritten.id);
        entries.push(entry);
    }

    progress.on_phase(Phase::Finalizing).await;
    repo.set_branch(&target.branch, &previous_commit)?;
    info!("Moved {} to {previous_commit}", target.branch);

    progress.on_phase(Phase::Complete).await;
    Ok((target.branch.clone(), entries))
}

/// Find the merge-base with the upstream and the commits above it
///
/// Commits are returned newest first.
fn walk_stack(repo: &dyn Repository, target: &PublishTarget) -> Result<(CommitInfo, Vec<CommitInfo>)> {
    let local_tip = repo.resolve(&format!("refs/heads/{}", target.branch))?;
    let upstream_tip = repo.resolve(&target.tracking.reference)?;
    let ancestor = find_common_ancestor(repo, &local_tip, &upstream_tip)?;

    if ancestor.id != upstream_tip {
        return Err(Error::NotUpToDate {
            branch: target.branch.clone(),
            tracking: target.tracking.name.clone(),
        });
    }

    let commits = collect_between(repo, &local_tip, &ancestor.id)?;
    if commits.is_empty() {
        return Err(Error::NothingToPublish);
    }

    Ok((ancestor, commits))
}

#[allow(clippy::too_many_arguments)]
async fn publish_entry(
    repo: &dyn Repository,
    platform: &dyn PlatformService,
    target: &PublishTarget,
    codec: &ChangeIdCodec,
    commit: &CommitInfo,
    previous_branch: &str,
    previous_commit: &str,
    progress: &dyn ProgressCallback,
) -> Result<StackEntry> {
    let rewritten = rewrite_onto(repo, codec, commit, previous_commit)?;
    let branch = platform.branch_name(&rewritten.change_id);

    progress.on_branch_push(&branch, PushStatus::Started).await;
    if let Err(e) = push_branch_at(repo, &target.tracking.remote, &branch, &rewritten.commit.id) {
        progress
            .on_branch_push(&branch, PushStatus::Failed(e.to_string()))
            .await;
        return Err(e);
    }
    progress.on_branch_push(&branch, PushStatus::Success).await;

    let title = rewritten.commit.summary().to_string();
    let description = codec.strip(&rewritten.commit.message);
    let reconciled =
        reconcile_review(platform, &branch, previous_branch, &title, &description).await?;

    repo.delete_branch(&branch)?;
    debug!("Deleted local branch {branch}");

    Ok(StackEntry {
        change_id: rewritten.change_id,
        original_id: rewritten.original_id,
        rewritten: rewritten.commit,
        branch,
        target_branch: previous_branch.to_string(),
        review: reconciled.review,
        created: reconciled.created,
    })
}
