//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, tests, ...) to receive
//! progress updates during a publish run.

use crate::types::StackEntry;
use async_trait::async_trait;
use std::fmt;

/// Publish phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Stashing local changes and fetching
    Preparing,
    /// Walking history above the upstream
    Walking,
    /// Rewriting, pushing and reconciling each commit
    Publishing,
    /// Moving the local branch and restoring the working tree
    Finalizing,
    /// Publish complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preparing => write!(f, "Preparing"),
            Self::Walking => write!(f, "Collecting commits"),
            Self::Publishing => write!(f, "Publishing"),
            Self::Finalizing => write!(f, "Finalizing"),
            Self::Complete => write!(f, "Done"),
        }
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// Push failed with error message
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "pushing"),
            Self::Success => write!(f, "pushed"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during publishing.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called when a branch is being pushed
    async fn on_branch_push(&self, branch: &str, status: PushStatus);

    /// Called when a stack entry is fully published
    async fn on_entry_published(&self, entry: &StackEntry);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_branch_push(&self, _branch: &str, _status: PushStatus) {}
    async fn on_entry_published(&self, _entry: &StackEntry) {}
    async fn on_message(&self, _message: &str) {}
}
