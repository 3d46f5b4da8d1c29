//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Platform, PlatformConfig, ReviewRequest, ReviewState};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::IssueState;
use octocrab::models::pulls::PullRequest;
use tracing::debug;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo,
                host,
            },
        })
    }
}

fn to_review_request(pr: &PullRequest) -> ReviewRequest {
    ReviewRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        source_branch: pr.head.ref_field.clone(),
        target_branch: pr.base.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        state: if matches!(pr.state, Some(IssueState::Open)) {
            ReviewState::Open
        } else {
            ReviewState::Closed
        },
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_review_requests(&self) -> Result<Vec<ReviewRequest>> {
        let first_page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;

        let prs = self.client.all_pages(first_page).await?;
        debug!("Listed {} open pull requests", prs.len());
        Ok(prs.iter().map(to_review_request).collect())
    }

    async fn find_review_request(&self, source_branch: &str) -> Result<Option<ReviewRequest>> {
        let head = format!("{}:{}", &self.config.owner, source_branch);

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(head)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        Ok(prs.items.first().map(to_review_request))
    }

    async fn create_review_request(
        &self,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        description: &str,
    ) -> Result<ReviewRequest> {
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, source_branch, target_branch)
            .body(description)
            .send()
            .await?;

        Ok(to_review_request(&pr))
    }

    async fn update_review_request(
        &self,
        existing: &ReviewRequest,
        target_branch: &str,
        title: &str,
    ) -> Result<ReviewRequest> {
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .update(existing.number)
            .base(target_branch)
            .title(title)
            .send()
            .await?;

        Ok(to_review_request(&pr))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
