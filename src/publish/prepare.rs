//! Read-only checks before a publish run

use crate::config::Config;
use crate::error::{Error, Result};
use crate::repo::Repository;
use crate::types::TrackingBranch;
use tracing::debug;

/// What a publish run operates on
#[derive(Debug, Clone)]
pub struct PublishTarget {
    /// Local branch being published (one of the main branches)
    pub branch: String,
    /// Its upstream
    pub tracking: TrackingBranch,
    /// URL of the upstream's remote
    pub remote_url: String,
}

/// Check that the repository can be published from and find its upstream
///
/// Nothing is modified, so a failure here needs no cleanup.
pub fn prepare_publish(repo: &dyn Repository, config: &Config) -> Result<PublishTarget> {
    let branch = repo.current_branch()?.ok_or(Error::DetachedHead)?;

    if !config.is_main_branch(&branch) {
        return Err(Error::NotOnMainBranch {
            branch,
            allowed: config.main_branches.join(", "),
        });
    }

    let tracking = repo
        .tracking_branch(&branch)?
        .ok_or_else(|| Error::NoTrackingBranch(branch.clone()))?;
    let remote_url = repo.remote_url(&tracking.remote)?;

    debug!("Publishing {branch} against {} ({remote_url})", tracking.name);

    Ok(PublishTarget {
        branch,
        tracking,
        remote_url,
    })
}
