//! Home page session: intake, clarifying questions, analysis and the result loop.
//!
//! The session is a single `Phase` value rather than a set of loading flags, so
//! "generating questions" and "analyzing" can never be true at once. Every
//! phase change is published on a watch channel for progress indicators.

use tokio::sync::watch;
use tracing::{error, warn};

use crate::client::{HomieClient, RECENT_TICKET_LIMIT};
use crate::feedback::{FeedbackPanel, FollowUpQa};
use crate::intake::{AnalysisRequest, IntakeForm};
use crate::models::{AnalyzeResponse, Ticket};
use crate::questions::{merge_answers, Answers, FlowStep, QuestionFlow};
use crate::results::ResultView;
use crate::{Error, Result};

/// Observable summary of `Phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    GeneratingQuestions,
    AwaitingAnswers,
    Analyzing,
    ShowingResult,
}

impl PhaseKind {
    pub fn is_loading(&self) -> bool {
        matches!(self, PhaseKind::GeneratingQuestions | PhaseKind::Analyzing)
    }

    /// Progress text for loading phases.
    pub fn loading_message(&self) -> Option<&'static str> {
        match self {
            PhaseKind::GeneratingQuestions => Some("Generating questions..."),
            PhaseKind::Analyzing => Some("Analyzing your issue..."),
            _ => None,
        }
    }
}

/// A received analysis and the interactions hanging off it.
#[derive(Debug, Clone)]
pub struct ResultSession {
    response: AnalyzeResponse,
    view: ResultView,
    feedback: FeedbackPanel,
    followup: FollowUpQa,
}

impl ResultSession {
    pub fn new(response: AnalyzeResponse, view: ResultView) -> Self {
        Self {
            feedback: FeedbackPanel::new(response.ticket_id),
            followup: FollowUpQa::new(),
            response,
            view,
        }
    }

    pub fn response(&self) -> &AnalyzeResponse {
        &self.response
    }

    pub fn ticket_id(&self) -> i64 {
        self.response.ticket_id
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn feedback(&self) -> &FeedbackPanel {
        &self.feedback
    }

    pub fn followup(&self) -> &FollowUpQa {
        &self.followup
    }
}

#[derive(Debug)]
pub enum Phase {
    Idle,
    GeneratingQuestions,
    AwaitingAnswers(QuestionFlow),
    Analyzing,
    ShowingResult(Box<ResultSession>),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::GeneratingQuestions => PhaseKind::GeneratingQuestions,
            Phase::AwaitingAnswers(_) => PhaseKind::AwaitingAnswers,
            Phase::Analyzing => PhaseKind::Analyzing,
            Phase::ShowingResult(_) => PhaseKind::ShowingResult,
        }
    }
}

/// What a submit led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Clarifying questions are waiting; analysis has not been requested
    QuestionsReady,
    /// A fresh result is on screen
    Analyzed,
}

pub struct HomeSession {
    client: HomieClient,
    form: IntakeForm,
    phase: Phase,
    /// Request captured when the questions were fetched
    pending: Option<AnalysisRequest>,
    error: Option<String>,
    probe_images: bool,
    phase_tx: watch::Sender<PhaseKind>,
}

impl HomeSession {
    pub fn new(client: HomieClient) -> Self {
        let (phase_tx, _) = watch::channel(PhaseKind::Idle);
        Self {
            client,
            form: IntakeForm::new(),
            phase: Phase::Idle,
            pending: None,
            error: None,
            probe_images: true,
            phase_tx,
        }
    }

    /// Skip the broken-image probe when preparing results.
    pub fn without_image_probe(mut self) -> Self {
        self.probe_images = false;
        self
    }

    pub fn client(&self) -> &HomieClient {
        &self.client
    }

    /// Phase changes, starting from the current phase.
    pub fn subscribe(&self) -> watch::Receiver<PhaseKind> {
        self.phase_tx.subscribe()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn form(&self) -> &IntakeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut IntakeForm {
        &mut self.form
    }

    /// Error from the last failed action, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn question_flow(&self) -> Option<&QuestionFlow> {
        match &self.phase {
            Phase::AwaitingAnswers(flow) => Some(flow),
            _ => None,
        }
    }

    pub fn question_flow_mut(&mut self) -> Option<&mut QuestionFlow> {
        match &mut self.phase {
            Phase::AwaitingAnswers(flow) => Some(flow),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ResultSession> {
        match &self.phase {
            Phase::ShowingResult(result) => Some(&**result),
            _ => None,
        }
    }

    /// Most recent tickets for the home page; empty when the list cannot be loaded.
    pub async fn recent_projects(&self) -> Vec<Ticket> {
        match self.client.recent_tickets(RECENT_TICKET_LIMIT).await {
            Ok(tickets) => tickets,
            Err(e) => {
                error!(error = %e, "Failed to fetch recent tickets");
                Vec::new()
            }
        }
    }

    fn set_phase(&mut self, phase: Phase) -> Phase {
        let previous = std::mem::replace(&mut self.phase, phase);
        self.phase_tx.send_replace(self.phase.kind());
        previous
    }

    fn restore_phase(&mut self, mut previous: Phase) {
        if let Phase::AwaitingAnswers(flow) = &mut previous {
            flow.reopen();
        }
        self.set_phase(previous);
    }

    /// Submit the intake form.
    ///
    /// Long enough descriptions first ask the backend for clarifying questions.
    /// Any problem with that step is logged and analysis proceeds directly.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.user_message());
                return Err(e);
            }
        };
        self.error = None;

        let in_question_flow = matches!(self.phase, Phase::AwaitingAnswers(_));
        if !in_question_flow && self.form.wants_questions() {
            let description = request.description.clone().unwrap_or_default();
            let previous = self.set_phase(Phase::GeneratingQuestions);

            match self.client.generate_questions(&description).await {
                Ok(Some(set)) => match QuestionFlow::new(set) {
                    Some(flow) => {
                        self.pending = Some(request);
                        self.set_phase(Phase::AwaitingAnswers(flow));
                        return Ok(SubmitOutcome::QuestionsReady);
                    }
                    None => warn!("Question set was empty, proceeding with analysis"),
                },
                Ok(None) => warn!("No follow-up questions generated, proceeding with analysis"),
                Err(e) => warn!(
                    error = %e,
                    "Failed to generate follow-up questions, proceeding with analysis"
                ),
            }

            self.restore_phase(previous);
        }

        self.analyze(request).await
    }

    /// Advance the question flow; the last `next` sends the analysis.
    pub async fn next_question(&mut self) -> Result<FlowStep> {
        let flow = self
            .question_flow_mut()
            .ok_or_else(|| Error::validation("No questions are waiting for answers"))?;
        let step = flow.next()?;

        if let FlowStep::Submit(answers) = &step {
            self.submit_answers(answers).await?;
        }
        Ok(step)
    }

    /// Abandon the questions and analyze the original description.
    pub async fn skip_questions(&mut self) -> Result<SubmitOutcome> {
        let flow = self
            .question_flow_mut()
            .ok_or_else(|| Error::validation("No questions are waiting for answers"))?;
        flow.skip();

        let request = self
            .pending
            .clone()
            .ok_or_else(|| Error::validation("No pending submission"))?;
        self.analyze(request).await
    }

    async fn submit_answers(&mut self, answers: &Answers) -> Result<SubmitOutcome> {
        let pending = self
            .pending
            .clone()
            .ok_or_else(|| Error::validation("No pending submission"))?;
        let flow = self
            .question_flow()
            .ok_or_else(|| Error::validation("No questions are waiting for answers"))?;

        let original = pending.description.as_deref().unwrap_or_default();
        let merged = merge_answers(original, flow.in_question_order(answers));
        self.analyze(AnalysisRequest::new(&merged, pending.image)).await
    }

    async fn analyze(&mut self, request: AnalysisRequest) -> Result<SubmitOutcome> {
        let previous = self.set_phase(Phase::Analyzing);

        match self.client.analyze(&request).await {
            Ok(response) => {
                let mut view = ResultView::new(&response);
                if self.probe_images {
                    let broken = self.client.broken_images(&view.image_urls()).await;
                    view.hide_images(&broken);
                }

                // A fresh result replaces every piece of transient state.
                self.form.reset();
                self.pending = None;
                self.error = None;
                self.set_phase(Phase::ShowingResult(Box::new(ResultSession::new(
                    response, view,
                ))));
                Ok(SubmitOutcome::Analyzed)
            }
            Err(e) => {
                error!(error = %e, "Analysis error");
                self.error = Some(e.user_message());
                self.restore_phase(previous);
                Err(e)
            }
        }
    }

    fn result_mut(&mut self) -> Result<&mut ResultSession> {
        match &mut self.phase {
            Phase::ShowingResult(result) => Ok(&mut **result),
            _ => Err(Error::validation("There is no result to respond to")),
        }
    }

    pub async fn mark_helpful(&mut self) -> Result<()> {
        let client = self.client.clone();
        self.result_mut()?.feedback.mark_helpful(&client).await;
        Ok(())
    }

    pub fn mark_not_helpful(&mut self) -> Result<()> {
        self.result_mut()?.feedback.mark_not_helpful();
        Ok(())
    }

    pub fn cancel_feedback(&mut self) -> Result<()> {
        self.result_mut()?.feedback.cancel();
        Ok(())
    }

    pub async fn submit_feedback_comment(&mut self, text: &str) -> Result<()> {
        let client = self.client.clone();
        self.result_mut()?.feedback.submit_comment(&client, text).await
    }

    pub fn reset_feedback(&mut self) -> Result<()> {
        self.result_mut()?.feedback.reset();
        Ok(())
    }

    pub fn open_follow_up(&mut self) -> Result<()> {
        self.result_mut()?.followup.open();
        Ok(())
    }

    pub fn cancel_follow_up(&mut self) -> Result<()> {
        self.result_mut()?.followup.cancel();
        Ok(())
    }

    /// Ask about the result on screen; returns the answer text.
    pub async fn ask_follow_up(&mut self, question: &str) -> Result<String> {
        let client = self.client.clone();
        let ResultSession {
            response, followup, ..
        } = self.result_mut()?;
        let answer = followup.ask(&client, &response.result, question).await?;
        Ok(answer.to_string())
    }

    /// Back to an empty intake form.
    pub fn start_over(&mut self) {
        self.form.reset();
        self.pending = None;
        self.error = None;
        self.set_phase(Phase::Idle);
    }
}
