//! In-memory review platform for publish tests

#![allow(dead_code)]

use async_trait::async_trait;
use git_publish::error::{Error, Result};
use git_publish::platform::PlatformService;
use git_publish::types::{Platform, PlatformConfig, ReviewRequest, ReviewState};
use std::sync::Mutex;

/// Call record for `create_review_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCall {
    pub source: String,
    pub target: String,
    pub title: String,
    pub description: String,
}

/// Call record for `update_review_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub number: u64,
    pub target: String,
    pub title: String,
}

/// Mock platform service
///
/// Keeps created review requests so that a second publish run against the
/// same mock sees them, the way a real host would.
///
/// Features:
/// - Auto-incrementing review numbers
/// - Call tracking for verification
/// - Error injection, optionally after a number of successful creates
pub struct MockPlatformService {
    config: PlatformConfig,
    reviews: Mutex<Vec<ReviewRequest>>,
    find_calls: Mutex<Vec<String>>,
    create_calls: Mutex<Vec<CreateCall>>,
    update_calls: Mutex<Vec<UpdateCall>>,
    fail_create_after: Mutex<Option<(usize, String)>>,
    fail_find: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a mock for `test/repo` on GitHub
    pub fn new() -> Self {
        Self::with_config(PlatformConfig {
            platform: Platform::GitHub,
            owner: "test".to_string(),
            repo: "repo".to_string(),
            host: None,
        })
    }

    /// Create a mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            reviews: Mutex::new(Vec::new()),
            find_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            fail_create_after: Mutex::new(None),
            fail_find: Mutex::new(None),
        }
    }

    // === Setup ===

    /// Pretend a review request already exists on the host
    pub fn seed_review(&self, source: &str, target: &str, title: &str) -> ReviewRequest {
        let mut reviews = self.reviews.lock().unwrap();
        let number = reviews.len() as u64 + 1;
        let review = make_review(number, source, target, title);
        reviews.push(review.clone());
        review
    }

    /// Make `create_review_request` fail once `successes` creates went through
    pub fn fail_create_after(&self, successes: usize, msg: &str) {
        *self.fail_create_after.lock().unwrap() = Some((successes, msg.to_string()));
    }

    /// Make `find_review_request` fail
    pub fn fail_find(&self, msg: &str) {
        *self.fail_find.lock().unwrap() = Some(msg.to_string());
    }

    // === Verification ===

    pub fn reviews(&self) -> Vec<ReviewRequest> {
        self.reviews.lock().unwrap().clone()
    }

    pub fn find_calls(&self) -> Vec<String> {
        self.find_calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<CreateCall> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<UpdateCall> {
        self.update_calls.lock().unwrap().clone()
    }

    /// Assert that a review request was created from `source` into `target`
    pub fn assert_created(&self, source: &str, target: &str) {
        let calls = self.create_calls();
        assert!(
            calls.iter().any(|c| c.source == source && c.target == target),
            "Expected create({source} -> {target}) but got: {calls:?}"
        );
    }
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an open review request
pub fn make_review(number: u64, source: &str, target: &str, title: &str) -> ReviewRequest {
    ReviewRequest {
        number,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        source_branch: source.to_string(),
        target_branch: target.to_string(),
        title: title.to_string(),
        state: ReviewState::Open,
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_review_requests(&self) -> Result<Vec<ReviewRequest>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.state == ReviewState::Open)
            .cloned()
            .collect())
    }

    async fn find_review_request(&self, source_branch: &str) -> Result<Option<ReviewRequest>> {
        self.find_calls
            .lock()
            .unwrap()
            .push(source_branch.to_string());

        if let Some(msg) = self.fail_find.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(self
            .list_open_review_requests()
            .await?
            .into_iter()
            .find(|r| r.source_branch == source_branch))
    }

    async fn create_review_request(
        &self,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        description: &str,
    ) -> Result<ReviewRequest> {
        let mut calls = self.create_calls.lock().unwrap();
        if let Some((successes, msg)) = self.fail_create_after.lock().unwrap().as_ref() {
            if calls.len() >= *successes {
                return Err(Error::Platform(msg.clone()));
            }
        }
        calls.push(CreateCall {
            source: source_branch.to_string(),
            target: target_branch.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        });

        let mut reviews = self.reviews.lock().unwrap();
        let number = reviews.len() as u64 + 1;
        let review = make_review(number, source_branch, target_branch, title);
        reviews.push(review.clone());
        Ok(review)
    }

    async fn update_review_request(
        &self,
        existing: &ReviewRequest,
        target_branch: &str,
        title: &str,
    ) -> Result<ReviewRequest> {
        self.update_calls.lock().unwrap().push(UpdateCall {
            number: existing.number,
            target: target_branch.to_string(),
            title: title.to_string(),
        });

        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.number == existing.number)
            .ok_or_else(|| Error::Platform(format!("no review #{}", existing.number)))?;
        review.target_branch = target_branch.to_string();
        review.title = title.to_string();
        Ok(review.clone())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
