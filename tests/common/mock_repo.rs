//! In-memory repository for publish tests

#![allow(dead_code)]

use git_publish::error::{Error, Result};
use git_publish::repo::Repository;
use git_publish::types::{CommitInfo, TrackingBranch};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Record of one `push_branch` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCall {
    pub remote: String,
    pub branch: String,
    pub commit: String,
}

#[derive(Default)]
struct State {
    next_id: u64,
    commits: HashMap<String, CommitInfo>,
    branches: HashMap<String, String>,
    remote_refs: HashMap<String, String>,
    tracking: HashMap<String, TrackingBranch>,
    remotes: HashMap<String, String>,
    head: Option<String>,
    merge_base_override: Option<Vec<String>>,
    dirty: bool,
    stash: Vec<String>,
    stash_pushes: usize,
    stash_pops: usize,
    fetches: usize,
    pushes: Vec<PushCall>,
    deleted: Vec<String>,
    fail_push_after: Option<usize>,
    stash_saves_nothing: bool,
}

/// Repository backed by hash maps
///
/// `new()` sets up `main` tracking `origin/main`, both at a root commit,
/// with `origin` pointing at a GitHub URL.
pub struct MockRepository {
    state: Mutex<State>,
}

impl MockRepository {
    pub fn new() -> Self {
        let repo = Self {
            state: Mutex::new(State::default()),
        };
        let root = repo.add_commit(&[], "Initial commit\n");
        {
            let mut state = repo.state.lock().unwrap();
            state.branches.insert("main".into(), root.clone());
            state
                .remote_refs
                .insert("refs/remotes/origin/main".into(), root);
            state.tracking.insert(
                "main".into(),
                TrackingBranch {
                    remote: "origin".into(),
                    name: "origin/main".into(),
                    reference: "refs/remotes/origin/main".into(),
                },
            );
            state
                .remotes
                .insert("origin".into(), "git@github.com:test/repo.git".into());
            state.head = Some("main".into());
        }
        repo
    }

    // === Building history ===

    /// Store a commit with the given parents and return its ID
    pub fn add_commit(&self, parents: &[&str], message: &str) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("{:040x}", state.next_id);
        state.commits.insert(
            id.clone(),
            CommitInfo {
                id: id.clone(),
                message: message.to_string(),
                parents: parents.iter().map(ToString::to_string).collect(),
            },
        );
        id
    }

    /// Commit on top of a branch and advance it
    pub fn commit_on(&self, branch: &str, message: &str) -> String {
        let tip = self.branch_tip(branch).expect("branch exists");
        let id = self.add_commit(&[&tip], message);
        self.state
            .lock()
            .unwrap()
            .branches
            .insert(branch.to_string(), id.clone());
        id
    }

    /// Point a local branch at a commit
    pub fn set_local(&self, branch: &str, commit: &str) {
        self.state
            .lock()
            .unwrap()
            .branches
            .insert(branch.to_string(), commit.to_string());
    }

    /// Point `origin/main` at a commit
    pub fn set_upstream(&self, commit: &str) {
        self.state
            .lock()
            .unwrap()
            .remote_refs
            .insert("refs/remotes/origin/main".into(), commit.to_string());
    }

    /// Check out a branch (or detach HEAD with `None`)
    pub fn checkout(&self, branch: Option<&str>) {
        self.state.lock().unwrap().head = branch.map(String::from);
    }

    /// Drop the upstream of a branch
    pub fn untrack(&self, branch: &str) {
        self.state.lock().unwrap().tracking.remove(branch);
    }

    /// Force `merge_bases` to return these IDs
    pub fn override_merge_bases(&self, bases: &[&str]) {
        self.state.lock().unwrap().merge_base_override =
            Some(bases.iter().map(ToString::to_string).collect());
    }

    pub fn make_dirty(&self) {
        self.state.lock().unwrap().dirty = true;
    }

    /// Leave an entry of the user's own on the stash
    pub fn seed_stash(&self, message: &str) {
        self.state.lock().unwrap().stash.push(message.to_string());
    }

    /// Make `stash_push` report dirt but save nothing, like `git stash`
    /// skipping changes libgit2 counted
    pub fn stash_saves_nothing(&self) {
        self.state.lock().unwrap().stash_saves_nothing = true;
    }

    pub fn stash_entries(&self) -> Vec<String> {
        self.state.lock().unwrap().stash.clone()
    }

    /// Make `push_branch` fail once `successes` pushes went through
    pub fn fail_push_after(&self, successes: usize) {
        self.state.lock().unwrap().fail_push_after = Some(successes);
    }

    // === Inspection ===

    pub fn branch_tip(&self, branch: &str) -> Option<String> {
        self.state.lock().unwrap().branches.get(branch).cloned()
    }

    /// Current tip of `origin/main`
    pub fn resolve_upstream(&self) -> String {
        self.state.lock().unwrap().remote_refs["refs/remotes/origin/main"].clone()
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        self.state.lock().unwrap().branches.contains_key(branch)
    }

    pub fn get_commit(&self, id: &str) -> CommitInfo {
        self.state.lock().unwrap().commits[id].clone()
    }

    /// Commits from `tip` down to the root, following first parents
    pub fn first_parent_chain(&self, tip: &str) -> Vec<CommitInfo> {
        let state = self.state.lock().unwrap();
        let mut chain = Vec::new();
        let mut current = Some(tip.to_string());
        while let Some(id) = current {
            let commit = state.commits[&id].clone();
            current = commit.parents.first().cloned();
            chain.push(commit);
        }
        chain
    }

    pub fn pushes(&self) -> Vec<PushCall> {
        self.state.lock().unwrap().pushes.clone()
    }

    pub fn deleted_branches(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn is_dirty_now(&self) -> bool {
        self.state.lock().unwrap().dirty
    }

    /// (stash pushes, stash pops)
    pub fn stash_counts(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.stash_pushes, state.stash_pops)
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().unwrap().fetches
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn ancestors(commits: &HashMap<String, CommitInfo>, start: &str) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut queue = vec![start.to_string()];
    while let Some(id) = queue.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(commit) = commits.get(&id) {
            queue.extend(commit.parents.iter().cloned());
        }
    }
    seen
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.state.lock().unwrap().head.clone())
    }

    fn tracking_branch(&self, branch: &str) -> Result<Option<TrackingBranch>> {
        Ok(self.state.lock().unwrap().tracking.get(branch).cloned())
    }

    fn resolve(&self, reference: &str) -> Result<String> {
        let state = self.state.lock().unwrap();
        let found = if let Some(name) = reference.strip_prefix("refs/heads/") {
            state.branches.get(name)
        } else if reference.starts_with("refs/remotes/") {
            state.remote_refs.get(reference)
        } else {
            state.branches.get(reference)
        };
        found
            .cloned()
            .or_else(|| state.commits.contains_key(reference).then(|| reference.to_string()))
            .ok_or_else(|| Error::Internal(format!("unknown reference {reference}")))
    }

    fn merge_bases(&self, left: &str, right: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if let Some(bases) = &state.merge_base_override {
            return Ok(bases.clone());
        }
        let left_set = ancestors(&state.commits, left);
        let right_set = ancestors(&state.commits, right);
        let common: HashSet<_> = left_set.intersection(&right_set).cloned().collect();
        let mut bases: Vec<String> = common
            .iter()
            .filter(|candidate| {
                !common.iter().any(|other| {
                    other != *candidate && ancestors(&state.commits, other).contains(*candidate)
                })
            })
            .cloned()
            .collect();
        bases.sort();
        Ok(bases)
    }

    fn commit(&self, id: &str) -> Result<CommitInfo> {
        self.state
            .lock()
            .unwrap()
            .commits
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Internal(format!("unknown commit {id}")))
    }

    fn rewrite_commit(
        &self,
        id: &str,
        message: Option<&str>,
        parents: &[String],
    ) -> Result<CommitInfo> {
        let original = self.commit(id)?;
        let message = message.unwrap_or(&original.message);
        let parents: Vec<&str> = parents.iter().map(String::as_str).collect();
        let new_id = self.add_commit(&parents, message);
        self.commit(&new_id)
    }

    fn set_branch(&self, name: &str, commit: &str) -> Result<()> {
        self.set_local(name, commit);
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .branches
            .remove(name)
            .ok_or_else(|| Error::Internal(format!("no branch {name}")))?;
        state.deleted.push(name.to_string());
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(successes) = state.fail_push_after {
            if state.pushes.len() >= successes {
                return Err(Error::PushRejected {
                    branch: branch.to_string(),
                    remote: remote.to_string(),
                    message: "rejected by mock".to_string(),
                });
            }
        }
        let commit = state
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::Internal(format!("no branch {branch}")))?;
        state.pushes.push(PushCall {
            remote: remote.to_string(),
            branch: branch.to_string(),
            commit,
        });
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.state
            .lock()
            .unwrap()
            .remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| Error::Internal(format!("no remote {remote}")))
    }

    fn fetch_all(&self) -> Result<()> {
        self.state.lock().unwrap().fetches += 1;
        Ok(())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().dirty)
    }

    fn stash_push(&self, message: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.stash_pushes += 1;
        if state.stash_saves_nothing {
            return Ok(false);
        }
        state.stash.push(message.to_string());
        state.dirty = false;
        Ok(true)
    }

    fn stash_pop(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .stash
            .pop()
            .ok_or_else(|| Error::Internal("no stash entries".to_string()))?;
        state.stash_pops += 1;
        state.dirty = true;
        Ok(())
    }
}
