//! Throwaway on-disk repositories with a bare local remote

#![allow(dead_code)]

use git2::{BranchType, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A working repository on `main` tracking `origin/main`, where `origin` is
/// a bare repository in the same temp directory
pub struct TempGitRepo {
    dir: TempDir,
    work: PathBuf,
    remote: PathBuf,
}

impl TempGitRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let work = dir.path().join("work");
        let remote = dir.path().join("remote.git");

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        Repository::init_opts(&remote, opts.bare(true)).expect("init bare remote");

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(&work, &opts).expect("init work repo");
        {
            let mut config = repo.config().expect("repo config");
            config.set_str("user.name", "Test Author").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_str("commit.gpgsign", "false").unwrap();
        }
        repo.remote("origin", remote.to_str().expect("utf-8 path"))
            .expect("add origin");

        let this = Self { dir, work, remote };
        this.commit_file("README.md", "hello\n", "Initial commit");
        this.git(&["push", "--quiet", "origin", "main"]);
        this.git(&["fetch", "--quiet", "origin"]);

        let repo = this.repo();
        let mut main = repo.find_branch("main", BranchType::Local).unwrap();
        main.set_upstream(Some("origin/main")).unwrap();
        this
    }

    /// Working tree path
    pub fn path(&self) -> &Path {
        &self.work
    }

    /// Fresh handle on the working repository
    pub fn repo(&self) -> Repository {
        Repository::open(&self.work).expect("open work repo")
    }

    /// Write a file, stage it and commit on HEAD, returning the commit ID
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> String {
        fs::write(self.work.join(name), content).expect("write file");
        let repo = self.repo();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("Test Author", "test@example.com").unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
            .to_string()
    }

    /// Write a file without staging it
    pub fn write_untracked(&self, name: &str, content: &str) {
        fs::write(self.work.join(name), content).expect("write file");
    }

    /// Run git in the working tree, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work)
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Tip of a branch in the bare remote
    pub fn remote_branch(&self, name: &str) -> Option<String> {
        let remote = Repository::open_bare(&self.remote).expect("open remote");
        remote
            .find_reference(&format!("refs/heads/{name}"))
            .ok()
            .and_then(|r| r.target())
            .map(|oid| oid.to_string())
    }

    pub fn temp_root(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TempGitRepo {
    fn default() -> Self {
        Self::new()
    }
}
