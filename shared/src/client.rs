//! Client for the HomieFixie analysis backend.

use std::collections::HashSet;
use std::time::Duration;

use futures::future::join_all;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::http::{expect_success, read_json};
use crate::intake::{AnalysisRequest, EMPTY_SUBMISSION_MESSAGE};
use crate::models::{
    AnalyzeResponse, FeedbackRecord, FeedbackSubmission, FollowUpRequest, FollowUpResponse,
    GenerateQuestionsRequest, GenerateQuestionsResponse, QuestionSet, Ticket,
};
use crate::{Config, Error, Result};

/// Per-image limit for the broken-image check.
pub const IMAGE_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of tickets shown in the home page's recent projects list.
pub const RECENT_TICKET_LIMIT: usize = 20;

const ANALYZE_FALLBACK: &str = "Analysis failed";
const QUESTIONS_FALLBACK: &str = "Failed to generate questions";
const FEEDBACK_FALLBACK: &str = "Failed to submit feedback. Please try again.";
const FOLLOWUP_FALLBACK: &str = "Failed to answer follow-up question";
const TICKETS_FALLBACK: &str = "Failed to fetch tickets";
const FEEDBACK_LIST_FALLBACK: &str = "Failed to fetch feedback";

/// Thin typed wrapper over the backend's `/api/*` endpoints.
#[derive(Debug, Clone)]
pub struct HomieClient {
    http: reqwest::Client,
    config: Config,
    probe_timeout: Duration,
}

impl HomieClient {
    /// Create a new client for the given backend.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("homiefixie/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
            probe_timeout: IMAGE_PROBE_TIMEOUT,
        })
    }

    /// Override the per-image timeout used by `broken_images`.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Client for the process-wide configuration.
    pub fn from_global() -> Result<Self> {
        Self::new(Config::global())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Post a description and/or photo for analysis.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalyzeResponse> {
        if request.description.is_none() && request.image.is_none() {
            return Err(Error::validation(EMPTY_SUBMISSION_MESSAGE));
        }

        let mut form = Form::new();
        if let Some(description) = &request.description {
            form = form.text("description", description.clone());
        }
        if let Some(image) = &request.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)
                .map_err(|_| Error::validation("Please upload an image file"))?;
            form = form.part("image", part);
        }

        debug!(
            has_description = request.description.is_some(),
            has_image = request.image.is_some(),
            "Posting analysis request"
        );

        let response = self
            .http
            .post(self.config.endpoint("/api/analyze"))
            .multipart(form)
            .send()
            .await?;

        let analysis: AnalyzeResponse = read_json(response, ANALYZE_FALLBACK).await?;
        info!(ticket_id = analysis.ticket_id, "Analysis received");
        Ok(analysis)
    }

    /// Ask the backend for clarifying questions about a description.
    pub async fn generate_questions(&self, description: &str) -> Result<Option<QuestionSet>> {
        let response = self
            .http
            .post(self.config.endpoint("/api/generate-questions"))
            .json(&GenerateQuestionsRequest { description })
            .send()
            .await?;

        let body: GenerateQuestionsResponse = read_json(response, QUESTIONS_FALLBACK).await?;
        Ok(body.question_set)
    }

    pub async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<()> {
        let response = self
            .http
            .post(self.config.endpoint("/api/feedback"))
            .json(submission)
            .send()
            .await?;

        expect_success(response, FEEDBACK_FALLBACK).await?;
        info!(
            ticket_id = submission.ticket_id,
            feedback_type = %submission.feedback_type,
            "Feedback submitted"
        );
        Ok(())
    }

    /// Ask a free-text question about a previous analysis.
    pub async fn ask_followup(&self, original_analysis: &str, question: &str) -> Result<String> {
        let response = self
            .http
            .post(self.config.endpoint("/api/followup-question"))
            .json(&FollowUpRequest {
                original_analysis,
                question,
            })
            .send()
            .await?;

        let body: FollowUpResponse = read_json(response, FOLLOWUP_FALLBACK).await?;
        Ok(body.answer)
    }

    pub async fn tickets(&self) -> Result<Vec<Ticket>> {
        let response = self
            .http
            .get(self.config.endpoint("/api/tickets"))
            .send()
            .await?;

        read_json(response, TICKETS_FALLBACK).await
    }

    /// Newest tickets first, capped at `limit`.
    pub async fn recent_tickets(&self, limit: usize) -> Result<Vec<Ticket>> {
        let mut tickets = self.tickets().await?;
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets.truncate(limit);
        Ok(tickets)
    }

    pub async fn feedback(&self) -> Result<Vec<FeedbackRecord>> {
        let response = self
            .http
            .get(self.config.endpoint("/api/feedback"))
            .send()
            .await?;

        read_json(response, FEEDBACK_LIST_FALLBACK).await
    }

    /// Probe image URLs concurrently and return the ones that cannot be displayed.
    ///
    /// A probe that outlives the per-image timeout counts as broken.
    pub async fn broken_images(&self, urls: &[String]) -> HashSet<String> {
        let checks = urls.iter().map(|url| async move { (url, self.image_loads(url).await) });

        join_all(checks)
            .await
            .into_iter()
            .filter(|(_, loads)| !loads)
            .map(|(url, _)| {
                debug!(url = %url, "Hiding broken image");
                url.clone()
            })
            .collect()
    }

    async fn image_loads(&self, url: &str) -> bool {
        let head = self.http.head(url).timeout(self.probe_timeout).send().await;
        match head {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                // Some CDNs refuse HEAD; fall back to a real fetch.
                self.http
                    .get(url)
                    .timeout(self.probe_timeout)
                    .send()
                    .await
                    .map(|r| r.status().is_success())
                    .unwrap_or(false)
            }
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
