//! Shared library for the HomieFixie client.
//!
//! This crate holds the backend client, the home page session state machine,
//! and the presentation helpers used by the terminal frontend.

pub mod admin;
pub mod client;
pub mod config;
pub mod error;
pub mod feedback;
pub mod http;
pub mod intake;
pub mod models;
pub mod questions;
pub mod results;
pub mod session;

pub use admin::{Dashboard, FeedbackFilter, FeedbackStats};
pub use client::HomieClient;
pub use config::Config;
pub use error::{Error, Result};
pub use feedback::{FeedbackPanel, FeedbackState, FollowUpQa, FollowUpState};
pub use intake::{AnalysisRequest, ImageFile, ImagePreview, IntakeForm};
pub use models::{AnalysisResult, AnalyzeResponse, FeedbackRecord, FeedbackType, Question, QuestionSet, Ticket};
pub use questions::{FlowStep, QuestionFlow};
pub use results::ResultView;
pub use session::{HomeSession, Phase, PhaseKind, ResultSession, SubmitOutcome};
