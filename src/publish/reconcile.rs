//! Review request reconciliation

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::ReviewRequest;
use tracing::debug;

/// Result of reconciling one stack entry
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Review request after the update or creation
    pub review: ReviewRequest,
    /// Whether a new review request was created
    pub created: bool,
}

/// Create or update the review request for `source_branch`
///
/// An existing request gets its target and title updated; its description
/// is only ever set at creation.
pub async fn reconcile_review(
    platform: &dyn PlatformService,
    source_branch: &str,
    target_branch: &str,
    title: &str,
    description: &str,
) -> Result<Reconciled> {
    if let Some(existing) = platform.find_review_request(source_branch).await? {
        debug!(
            "Updating #{} ({source_branch}): target {} -> {target_branch}",
            existing.number, existing.target_branch
        );
        let review = platform
            .update_review_request(&existing, target_branch, title)
            .await?;
        return Ok(Reconciled {
            review,
            created: false,
        });
    }

    debug!("Creating review request {source_branch} -> {target_branch}");
    let review = platform
        .create_review_request(source_branch, target_branch, title, description)
        .await?;
    Ok(Reconciled {
        review,
        created: true,
    })
}
