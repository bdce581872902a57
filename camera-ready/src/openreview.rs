#![doc = "OpenReview integration for the CLI: implements the core `SubmissionSource` contract against the OpenReview API v2."]
//
//! # OpenReview client (CLI <-> Core)
//!
//! This module wires the [`SubmissionSource`] trait from `camera-ready-core` to the
//! real OpenReview REST API. It only ever reads from the platform.
//!
//! ## Client Usage
//!
//! - Construct [`OpenReviewClient`] with [`OpenReviewClient::new_from_env`], which reads
//!   `OPENREVIEW_USERNAME` and `OPENREVIEW_PASSWORD`.
//! - The client logs in lazily on first use and reuses the bearer token afterwards.
//! - Submissions are listed page by page (`limit=1000`) with `details=directReplies`,
//!   so decisions arrive together with the notes.

use std::env;

use async_trait::async_trait;
use camera_ready_core::config::OpenReviewConfig;
use camera_ready_core::contract::{SourceError, SubmissionSource};
use camera_ready_core::submission::Submission;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

pub const USERNAME_ENV: &str = "OPENREVIEW_USERNAME";
pub const PASSWORD_ENV: &str = "OPENREVIEW_PASSWORD";

/// Notes requested per page.
const PAGE_LIMIT: usize = 1000;

#[derive(Serialize)]
struct LoginRequest<'a> {
    id: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotesPage {
    #[serde(default)]
    notes: Vec<Submission>,
    #[serde(default)]
    count: Option<usize>,
}

impl NotesPage {
    /// Whether another page should be requested after this one.
    pub(crate) fn has_more(&self, fetched_so_far: usize) -> bool {
        if self.notes.len() < PAGE_LIMIT {
            return false;
        }
        self.count.map_or(true, |total| fetched_so_far < total)
    }
}

pub struct OpenReviewClient {
    http: Client,
    base_url: String,
    invitation: String,
    username: String,
    password: String,
    token: OnceCell<String>,
}

impl OpenReviewClient {
    pub fn new(config: &OpenReviewConfig, username: String, password: String) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            invitation: config.invitation.clone(),
            username,
            password,
            token: OnceCell::new(),
        }
    }

    pub fn new_from_env(config: &OpenReviewConfig) -> Result<Self, SourceError> {
        match (env::var(USERNAME_ENV), env::var(PASSWORD_ENV)) {
            (Ok(username), Ok(password)) => {
                tracing::info!(
                    base_url = %config.base_url,
                    invitation = %config.invitation,
                    username_set = !username.is_empty(),
                    "Initialized OpenReviewClient from environment"
                );
                Ok(Self::new(config, username, password))
            }
            (Err(e), _) => {
                tracing::error!(error = ?e, "{USERNAME_ENV} missing in environment");
                Err(format!("{USERNAME_ENV} is not set: {e}").into())
            }
            (_, Err(e)) => {
                tracing::error!(error = ?e, "{PASSWORD_ENV} missing in environment");
                Err(format!("{PASSWORD_ENV} is not set: {e}").into())
            }
        }
    }

    pub(crate) fn notes_query(&self, offset: usize) -> Vec<(&'static str, String)> {
        vec![
            ("invitation", self.invitation.clone()),
            ("details", "directReplies".to_string()),
            ("offset", offset.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ]
    }

    async fn token(&self) -> Result<&str, SourceError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                tracing::info!(base_url = %self.base_url, "Logging in to OpenReview");
                let response = self
                    .http
                    .post(format!("{}/login", self.base_url))
                    .json(&LoginRequest {
                        id: &self.username,
                        password: &self.password,
                    })
                    .send()
                    .await?
                    .error_for_status()
                    .map_err(|e| {
                        tracing::error!(error = %e, "OpenReview login rejected");
                        e
                    })?;
                let login: LoginResponse = response.json().await?;
                Ok::<_, SourceError>(login.token)
            })
            .await?;
        Ok(token.as_str())
    }
}

#[async_trait]
impl SubmissionSource for OpenReviewClient {
    async fn list_submissions(&self) -> Result<Vec<Submission>, SourceError> {
        let token = self.token().await?;
        let mut submissions = Vec::new();
        loop {
            let offset = submissions.len();
            let page: NotesPage = self
                .http
                .get(format!("{}/notes", self.base_url))
                .bearer_auth(token)
                .query(&self.notes_query(offset))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            let fetched = page.notes.len();
            let more = page.has_more(offset + fetched);
            submissions.extend(page.notes);
            tracing::debug!(offset, fetched, "Fetched page of submissions");
            if !more {
                break;
            }
        }
        tracing::info!(
            invitation = %self.invitation,
            count = submissions.len(),
            "Fetched submissions from OpenReview"
        );
        Ok(submissions)
    }

    async fn fetch_pdf(&self, submission_id: &str) -> Result<Vec<u8>, SourceError> {
        let token = self.token().await?;
        let response = self
            .http
            .get(format!("{}/pdf", self.base_url))
            .bearer_auth(token)
            .query(&[("id", submission_id)])
            .send()
            .await?;
        match response.error_for_status() {
            Ok(response) => {
                let bytes = response.bytes().await?;
                tracing::debug!(submission_id, size = bytes.len(), "Fetched PDF");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                tracing::error!(error = %e, submission_id, "API error fetching PDF");
                Err(Box::new(e))
            }
        }
    }
}
