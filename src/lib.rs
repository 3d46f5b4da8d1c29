//! git-publish - stacked review requests from a plain git branch
//!
//! Every commit a main branch has on top of its upstream becomes one review
//! request (a GitHub pull request or a GitLab merge request), each one
//! targeting the review branch of the commit below it.
//!
//! Commits are tagged with a change identifier trailer the first time they
//! are published. The identifier names the pushed branch, so re-running after
//! an amend or a reorder updates the same review requests instead of opening
//! new ones.

pub mod auth;
pub mod change_id;
pub mod config;
pub mod error;
pub mod graph;
pub mod platform;
pub mod publish;
pub mod repo;
pub mod types;

pub use error::{Error, ErrorKind, Result};
