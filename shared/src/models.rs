//! Wire types exchanged with the HomieFixie backend.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A material recommended for the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub spec: Option<String>,
    pub qty: Option<String>,
    pub description: Option<String>,
    /// Acceptable alternatives
    #[serde(default)]
    pub alt: Vec<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub store_price: Option<String>,
    pub store_name: Option<String>,
}

/// A tool needed for the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub purpose: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub store_price: Option<String>,
    pub store_name: Option<String>,
}

/// A tutorial video suggested alongside the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub url: String,
    pub title: String,
    pub channel: Option<String>,
    pub views: Option<String>,
    pub duration: Option<String>,
}

/// Structured recommendation for one submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Category -> ratio in [0, 1]
    pub likelihood: Option<BTreeMap<String, f64>>,
    pub safety: Option<Vec<String>>,
    /// Legacy single video link
    pub youtube_url: Option<String>,
    pub youtube_videos: Option<Vec<VideoRef>>,
}

/// `POST /api/analyze` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    #[serde(rename = "ticketId")]
    pub ticket_id: i64,
}

/// Analysis stored on a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketAnalysis {
    pub id: i64,
    pub ticket_id: i64,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub steps: Vec<String>,
    pub likelihood: Option<BTreeMap<String, f64>>,
    pub safety: Option<Vec<String>>,
    pub youtube_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Historical submission record owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub user_email: Option<String>,
    pub description: String,
    pub latest_analysis: Option<TicketAnalysis>,
}

/// Rating a user gives an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackType {
    Helpful,
    NotHelpful,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Helpful => "helpful",
            FeedbackType::NotHelpful => "not-helpful",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "helpful" => Some(FeedbackType::Helpful),
            "not-helpful" => Some(FeedbackType::NotHelpful),
            _ => None,
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `POST /api/feedback` body.
///
/// Absent text and email are sent as explicit `null`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub ticket_id: i64,
    pub feedback_type: FeedbackType,
    pub feedback_text: Option<String>,
    pub user_email: Option<String>,
}

/// Feedback row as listed for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub ticket_id: i64,
    pub feedback_type: String,
    pub feedback_text: Option<String>,
    pub user_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn kind(&self) -> Option<FeedbackType> {
        FeedbackType::parse(&self.feedback_type)
    }
}

/// How a clarifying question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    YesNo,
    Text,
}

/// One AI-generated clarifying question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

/// Clarifying questions generated from a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub category: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// `POST /api/generate-questions` body.
#[derive(Debug, Serialize)]
pub struct GenerateQuestionsRequest<'a> {
    pub description: &'a str,
}

/// `POST /api/generate-questions` response.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuestionsResponse {
    #[serde(rename = "questionSet", default)]
    pub question_set: Option<QuestionSet>,
}

/// `POST /api/followup-question` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRequest<'a> {
    pub original_analysis: &'a str,
    pub question: &'a str,
}

/// `POST /api/followup-question` response.
#[derive(Debug, Deserialize)]
pub struct FollowUpResponse {
    pub answer: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
}
