//! git2-backed repository
//!
//! Object and reference work goes through libgit2. Push, fetch and stash
//! shell out to `git` so that the user's credential helpers, SSH agent and
//! hooks behave exactly as they do on the command line.

use crate::error::{Error, Result};
use crate::repo::Repository;
use crate::types::{CommitInfo, TrackingBranch};
use git2::{BranchType, ErrorCode, Oid, Status, StatusOptions};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// A git repository on disk
pub struct GitRepository {
    repo: git2::Repository,
}

impl GitRepository {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        Ok(Self { repo })
    }

    /// Path to the `.git` directory
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| Error::Config("cannot publish from a bare repository".to_string()))
    }

    fn find_commit(&self, id: &str) -> Result<git2::Commit<'_>> {
        let oid = Oid::from_str(id)?;
        Ok(self.repo.find_commit(oid)?)
    }

    fn run_git(&self, args: &[&str]) -> Result<String> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(self.workdir()?)
            .output()?;

        if !output.status.success() {
            return Err(Error::GitCommand {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn to_commit_info(commit: &git2::Commit<'_>) -> CommitInfo {
    CommitInfo {
        id: commit.id().to_string(),
        message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
    }
}

impl Repository for GitRepository {
    fn current_branch(&self) -> Result<Option<String>> {
        if self.repo.head_detached()? {
            return Ok(None);
        }
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(head.shorthand().map(ToString::to_string))
    }

    fn tracking_branch(&self, branch: &str) -> Result<Option<TrackingBranch>> {
        let local = self.repo.find_branch(branch, BranchType::Local)?;
        let upstream = match local.upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let reference = upstream
            .get()
            .name()
            .ok_or_else(|| Error::Parse(format!("upstream of {branch} is not valid UTF-8")))?
            .to_string();
        let name = upstream
            .name()?
            .ok_or_else(|| Error::Parse(format!("upstream of {branch} is not valid UTF-8")))?
            .to_string();
        let remote_buf = self.repo.branch_remote_name(&reference)?;
        let remote = remote_buf
            .as_str()
            .ok_or_else(|| Error::Parse(format!("remote of {reference} is not valid UTF-8")))?
            .to_string();

        Ok(Some(TrackingBranch {
            remote,
            name,
            reference,
        }))
    }

    fn resolve(&self, reference: &str) -> Result<String> {
        let commit = self.repo.revparse_single(reference)?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn merge_bases(&self, left: &str, right: &str) -> Result<Vec<String>> {
        let left = Oid::from_str(left)?;
        let right = Oid::from_str(right)?;
        match self.repo.merge_bases(left, right) {
            Ok(bases) => Ok(bases.iter().map(ToString::to_string).collect()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn commit(&self, id: &str) -> Result<CommitInfo> {
        Ok(to_commit_info(&self.find_commit(id)?))
    }

    fn rewrite_commit(
        &self,
        id: &str,
        message: Option<&str>,
        parents: &[String],
    ) -> Result<CommitInfo> {
        let source = self.find_commit(id)?;
        let parent_commits = parents
            .iter()
            .map(|p| self.find_commit(p))
            .collect::<Result<Vec<_>>>()?;
        let parent_refs: Vec<&git2::Commit<'_>> = parent_commits.iter().collect();

        let original_message = String::from_utf8_lossy(source.message_bytes()).into_owned();
        let message = message.unwrap_or(&original_message);

        let oid = self.repo.commit(
            None,
            &source.author(),
            &source.committer(),
            message,
            &source.tree()?,
            &parent_refs,
        )?;

        let rewritten = self.repo.find_commit(oid)?;
        Ok(to_commit_info(&rewritten))
    }

    fn set_branch(&self, name: &str, commit: &str) -> Result<()> {
        let oid = Oid::from_str(commit)?;
        self.repo.reference(
            &format!("refs/heads/{name}"),
            oid,
            true,
            "git-publish: move branch",
        )?;
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        let mut branch = self.repo.find_branch(name, BranchType::Local)?;
        branch.delete()?;
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        self.run_git(&["push", "--force", "--quiet", remote, refspec.as_str()])
            .map_err(|e| match e {
                Error::GitCommand { stderr, .. } => Error::PushRejected {
                    branch: branch.to_string(),
                    remote: remote.to_string(),
                    message: stderr,
                },
                other => other,
            })?;
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let found = self.repo.find_remote(remote)?;
        found
            .url()
            .map(ToString::to_string)
            .ok_or_else(|| Error::Parse(format!("URL of remote {remote} is not valid UTF-8")))
    }

    fn fetch_all(&self) -> Result<()> {
        self.run_git(&["fetch", "--all", "--quiet"])?;
        Ok(())
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .include_ignored(false)
            .exclude_submodules(true);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .any(|entry| entry.status() != Status::CURRENT))
    }

    fn stash_push(&self, message: &str) -> Result<bool> {
        let before = self.run_git(&["stash", "list", "--format=%s"])?;
        self.run_git(&[
            "stash",
            "push",
            "--include-untracked",
            "--quiet",
            "--message",
            message,
        ])?;
        // `git stash push` exits 0 without saving anything when it sees no
        // changes, so check a new entry of ours landed on top.
        let after = self.run_git(&["stash", "list", "--format=%s"])?;
        let saved = after.lines().count() > before.lines().count()
            && after.lines().next().is_some_and(|top| top.ends_with(message));
        if !saved {
            debug!("git stash push saved nothing");
        }
        Ok(saved)
    }

    fn stash_pop(&self) -> Result<()> {
        self.run_git(&["stash", "pop", "--quiet"])?;
        Ok(())
    }
}
