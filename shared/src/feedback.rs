//! Post-result feedback and follow-up Q&A.

use tracing::{error, info};

use crate::client::HomieClient;
use crate::models::{AnalysisResult, FeedbackSubmission, FeedbackType};
use crate::{Error, Result};

/// Where the rating panel for one result currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackState {
    NoFeedback,
    /// "Not helpful" picked; the optional comment form is open
    AwaitingComment,
    Thanked(FeedbackType),
}

/// Helpful / not-helpful rating for a single ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPanel {
    ticket_id: i64,
    state: FeedbackState,
    error: Option<String>,
}

impl FeedbackPanel {
    pub fn new(ticket_id: i64) -> Self {
        Self {
            ticket_id,
            state: FeedbackState::NoFeedback,
            error: None,
        }
    }

    pub fn ticket_id(&self) -> i64 {
        self.ticket_id
    }

    pub fn state(&self) -> FeedbackState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submission(&self, feedback_type: FeedbackType, text: Option<&str>) -> FeedbackSubmission {
        FeedbackSubmission {
            ticket_id: self.ticket_id,
            feedback_type,
            feedback_text: text
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            user_email: None,
        }
    }

    /// Send a "helpful" rating right away.
    ///
    /// The user is thanked even if the request fails; the failure is only logged.
    pub async fn mark_helpful(&mut self, client: &HomieClient) {
        if self.state != FeedbackState::NoFeedback {
            return;
        }

        let submission = self.submission(FeedbackType::Helpful, None);
        if let Err(e) = client.submit_feedback(&submission).await {
            error!(ticket_id = self.ticket_id, error = %e, "Failed to submit helpful feedback");
        }
        self.error = None;
        self.state = FeedbackState::Thanked(FeedbackType::Helpful);
    }

    /// Open the comment form for a "not helpful" rating.
    pub fn mark_not_helpful(&mut self) {
        if self.state == FeedbackState::NoFeedback {
            self.state = FeedbackState::AwaitingComment;
        }
    }

    /// Close the comment form without sending anything.
    pub fn cancel(&mut self) {
        if self.state == FeedbackState::AwaitingComment {
            self.state = FeedbackState::NoFeedback;
            self.error = None;
        }
    }

    /// Send the "not helpful" rating with an optional comment.
    ///
    /// On failure the form stays open so the user can retry.
    pub async fn submit_comment(&mut self, client: &HomieClient, text: &str) -> Result<()> {
        if self.state != FeedbackState::AwaitingComment {
            return Err(Error::validation("Choose \"not helpful\" before leaving a comment"));
        }

        let submission = self.submission(FeedbackType::NotHelpful, Some(text));
        match client.submit_feedback(&submission).await {
            Ok(()) => {
                self.error = None;
                self.state = FeedbackState::Thanked(FeedbackType::NotHelpful);
                Ok(())
            }
            Err(e) => {
                error!(ticket_id = self.ticket_id, error = %e, "Failed to submit feedback");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// "Back to options" after thanking the user.
    pub fn reset(&mut self) {
        if matches!(self.state, FeedbackState::Thanked(_)) {
            self.state = FeedbackState::NoFeedback;
            self.error = None;
        }
    }
}

/// Where the follow-up question box is.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUpState {
    Closed,
    Composing,
    Answered(String),
}

/// Repeatable free-text Q&A about the result on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpQa {
    state: FollowUpState,
    error: Option<String>,
    asked: usize,
}

impl Default for FollowUpQa {
    fn default() -> Self {
        Self {
            state: FollowUpState::Closed,
            error: None,
            asked: 0,
        }
    }
}

impl FollowUpQa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FollowUpState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Questions answered so far for this result.
    pub fn asked(&self) -> usize {
        self.asked
    }

    /// Open the question box; from an answer this is "ask another question".
    pub fn open(&mut self) {
        self.state = FollowUpState::Composing;
        self.error = None;
    }

    pub fn cancel(&mut self) {
        self.state = FollowUpState::Closed;
        self.error = None;
    }

    pub fn answer(&self) -> Option<&str> {
        match &self.state {
            FollowUpState::Answered(answer) => Some(answer),
            _ => None,
        }
    }

    /// Send `question` together with a summary of `result`.
    pub async fn ask(
        &mut self,
        client: &HomieClient,
        result: &AnalysisResult,
        question: &str,
    ) -> Result<&str> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::validation("Please enter a question"));
        }

        self.state = FollowUpState::Composing;
        let summary = summarize_analysis(result);

        match client.ask_followup(&summary, question).await {
            Ok(answer) => {
                info!(asked = self.asked + 1, "Follow-up question answered");
                self.asked += 1;
                self.error = None;
                self.state = FollowUpState::Answered(answer);
                Ok(self.answer().unwrap_or_default())
            }
            Err(e) => {
                error!(error = %e, "Follow-up question failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

/// Short context block describing a result for the follow-up endpoint.
pub fn summarize_analysis(result: &AnalysisResult) -> String {
    let materials = result
        .materials
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let tools = result
        .tools
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let steps = result
        .steps
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ");
    let more = if result.steps.len() > 3 { "..." } else { "" };

    format!(
        "Project: Home improvement project\nMaterials: {}\nTools: {}\nSteps: {}{}",
        or_default(materials, "Various materials"),
        or_default(tools, "Various tools"),
        or_default(steps, "Step-by-step instructions provided"),
        more
    )
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Non-blank lines of an answer, one paragraph each.
pub fn answer_paragraphs(answer: &str) -> Vec<&str> {
    answer
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
