//! GitLab platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Platform, PlatformConfig, ReviewRequest, ReviewState};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    api_base: String,
    config: PlatformConfig,
    project_path: String,
}

#[derive(Deserialize)]
struct MergeRequest {
    iid: u64,
    web_url: String,
    source_branch: String,
    target_branch: String,
    title: String,
    state: String,
}

impl From<MergeRequest> for ReviewRequest {
    fn from(mr: MergeRequest) -> Self {
        Self {
            number: mr.iid,
            html_url: mr.web_url,
            source_branch: mr.source_branch,
            target_branch: mr.target_branch,
            title: mr.title,
            state: if mr.state == "opened" {
                ReviewState::Open
            } else {
                ReviewState::Closed
            },
        }
    }
}

#[derive(Serialize)]
struct CreateMrPayload<'a> {
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
    description: &'a str,
    remove_source_branch: bool,
}

#[derive(Serialize)]
struct UpdateMrPayload<'a> {
    target_branch: &'a str,
    title: &'a str,
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size for list requests (GitLab maximum)
const PER_PAGE: &str = "100";

impl GitLabService {
    /// Create a new GitLab service
    pub fn new(token: String, owner: String, repo: String, host: Option<String>) -> Self {
        let host = host.unwrap_or_else(|| "gitlab.com".to_string());
        let api_base = format!("https://{host}/api/v4");
        let project_path = format!("{owner}/{repo}");

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token,
            api_base,
            config: PlatformConfig {
                platform: Platform::GitLab,
                owner,
                repo,
                host: if host == "gitlab.com" {
                    None
                } else {
                    Some(host)
                },
            },
            project_path,
        }
    }

    /// Point the service at a different API root (e.g. `http://localhost:1234/api/v4`)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn encoded_project(&self) -> String {
        urlencoding::encode(&self.project_path).into_owned()
    }

    fn merge_requests_url(&self) -> String {
        self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ))
    }
}

fn check_status(response: Response) -> Result<Response> {
    response
        .error_for_status()
        .map_err(|e| Error::GitLabApi(e.to_string()))
}

fn next_page(response: &Response) -> Option<u32> {
    response
        .headers()
        .get("x-next-page")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl PlatformService for GitLabService {
    async fn list_open_review_requests(&self) -> Result<Vec<ReviewRequest>> {
        let url = self.merge_requests_url();
        let mut requests = Vec::new();
        let mut page = 1u32;

        loop {
            let page_param = page.to_string();
            let response = self
                .client
                .get(&url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(&[
                    ("state", "opened"),
                    ("per_page", PER_PAGE),
                    ("page", page_param.as_str()),
                ])
                .send()
                .await?;
            let response = check_status(response)?;
            let next = next_page(&response);

            let mrs: Vec<MergeRequest> = response.json().await?;
            requests.extend(mrs.into_iter().map(ReviewRequest::from));

            match next {
                Some(n) if n > page => page = n,
                _ => break,
            }
        }

        debug!("Listed {} open merge requests", requests.len());
        Ok(requests)
    }

    async fn find_review_request(&self, source_branch: &str) -> Result<Option<ReviewRequest>> {
        let response = self
            .client
            .get(self.merge_requests_url())
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("source_branch", source_branch), ("state", "opened")])
            .send()
            .await?;

        let mrs: Vec<MergeRequest> = check_status(response)?.json().await?;
        Ok(mrs.into_iter().next().map(ReviewRequest::from))
    }

    async fn create_review_request(
        &self,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        description: &str,
    ) -> Result<ReviewRequest> {
        let payload = CreateMrPayload {
            source_branch,
            target_branch,
            title,
            description,
            remove_source_branch: true,
        };

        let response = self
            .client
            .post(self.merge_requests_url())
            .header("PRIVATE-TOKEN", &self.token)
            .json(&payload)
            .send()
            .await?;

        let mr: MergeRequest = check_status(response)?.json().await?;
        Ok(mr.into())
    }

    async fn update_review_request(
        &self,
        existing: &ReviewRequest,
        target_branch: &str,
        title: &str,
    ) -> Result<ReviewRequest> {
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}",
            self.encoded_project(),
            existing.number
        ));

        let payload = UpdateMrPayload {
            target_branch,
            title,
        };

        let response = self
            .client
            .put(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&payload)
            .send()
            .await?;

        let mr: MergeRequest = check_status(response)?.json().await?;
        Ok(mr.into())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
