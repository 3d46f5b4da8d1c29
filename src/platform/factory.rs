//! Platform service factory
//!
//! Creates platform services based on configuration.

use crate::auth::{get_github_auth, get_gitlab_auth};
use crate::config::Config;
use crate::error::Result;
use crate::platform::{GitHubService, GitLabService, PlatformService};
use crate::types::{Platform, PlatformConfig};

/// Create a platform service from configuration
///
/// Credentials are resolved here, so a missing token fails before any
/// repository state is touched.
pub async fn create_platform_service(
    platform_config: &PlatformConfig,
    config: &Config,
) -> Result<Box<dyn PlatformService>> {
    match platform_config.platform {
        Platform::GitHub => {
            let auth = get_github_auth(config, platform_config.host.as_deref()).await?;
            Ok(Box::new(GitHubService::new(
                &auth.token,
                platform_config.owner.clone(),
                platform_config.repo.clone(),
                platform_config.host.clone(),
            )?))
        }
        Platform::GitLab => {
            let auth = get_gitlab_auth(config, platform_config.host.as_deref()).await?;
            Ok(Box::new(GitLabService::new(
                auth.token,
                platform_config.owner.clone(),
                platform_config.repo.clone(),
                Some(auth.host),
            )))
        }
    }
}
