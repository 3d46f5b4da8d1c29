//! Platform services for GitHub and GitLab
//!
//! Provides a unified interface for PR/MR operations across platforms.

mod detection;
mod factory;
mod github;
mod gitlab;

pub use detection::{detect_platform, parse_repo_info};
pub use factory::create_platform_service;
pub use github::GitHubService;
pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{PlatformConfig, ReviewRequest};
use async_trait::async_trait;

/// Platform service trait for PR/MR operations
///
/// This trait abstracts GitHub and GitLab operations, allowing the same
/// publishing logic to work with either platform. Review requests are keyed
/// by their source branch.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List all open review requests, following pagination
    async fn list_open_review_requests(&self) -> Result<Vec<ReviewRequest>>;

    /// Find the open review request whose source is `source_branch`
    ///
    /// If several match, the first one in listing order is returned.
    async fn find_review_request(&self, source_branch: &str) -> Result<Option<ReviewRequest>> {
        Ok(self
            .list_open_review_requests()
            .await?
            .into_iter()
            .find(|r| r.source_branch == source_branch))
    }

    /// Create a review request
    ///
    /// Where the platform supports it, the source branch is deleted on merge.
    async fn create_review_request(
        &self,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        description: &str,
    ) -> Result<ReviewRequest>;

    /// Retarget and retitle an existing review request
    ///
    /// The description is left alone.
    async fn update_review_request(
        &self,
        existing: &ReviewRequest,
        target_branch: &str,
        title: &str,
    ) -> Result<ReviewRequest>;

    /// Branch name used for a change identifier
    fn branch_name(&self, change_id: &str) -> String {
        change_id.to_string()
    }

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
