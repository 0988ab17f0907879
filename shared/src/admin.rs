//! Read-only admin dashboard over tickets and feedback.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use tracing::error;

use crate::client::HomieClient;
use crate::models::{FeedbackRecord, FeedbackType, Ticket, TicketAnalysis};
use crate::Error;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load admin data";
pub const NO_TICKETS_MESSAGE: &str = "No tickets found";

/// Feedback list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackFilter {
    #[default]
    All,
    Helpful,
    NotHelpful,
}

impl FeedbackFilter {
    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        match self {
            FeedbackFilter::All => true,
            FeedbackFilter::Helpful => record.kind() == Some(FeedbackType::Helpful),
            FeedbackFilter::NotHelpful => record.kind() == Some(FeedbackType::NotHelpful),
        }
    }
}

impl FromStr for FeedbackFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FeedbackFilter::All),
            "helpful" => Ok(FeedbackFilter::Helpful),
            "not-helpful" => Ok(FeedbackFilter::NotHelpful),
            other => Err(Error::validation(format!("Unknown feedback filter: {}", other))),
        }
    }
}

impl fmt::Display for FeedbackFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FeedbackFilter::All => "all",
            FeedbackFilter::Helpful => "helpful",
            FeedbackFilter::NotHelpful => "not-helpful",
        })
    }
}

/// Aggregates computed from the full feedback list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackStats {
    pub helpful: usize,
    pub not_helpful: usize,
    pub total: usize,
}

impl FeedbackStats {
    pub fn from_records(records: &[FeedbackRecord]) -> Self {
        let count = |kind| records.iter().filter(|r| r.kind() == Some(kind)).count();
        Self {
            helpful: count(FeedbackType::Helpful),
            not_helpful: count(FeedbackType::NotHelpful),
            total: records.len(),
        }
    }

    /// Helpful share in percent; 0 when there is no feedback.
    pub fn helpful_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.helpful as f64 / self.total as f64 * 100.0
        }
    }

    /// Rate with one decimal, e.g. `"66.7%"`.
    pub fn helpful_rate_display(&self) -> String {
        format!("{:.1}%", self.helpful_rate())
    }
}

/// Local, human-readable timestamp.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Labelled lines summarizing a ticket's stored analysis; empty parts are left out.
pub fn analysis_summary(analysis: &TicketAnalysis) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();
    if !analysis.materials.is_empty() {
        let names: Vec<&str> = analysis.materials.iter().map(|m| m.name.as_str()).collect();
        lines.push(("Materials", names.join(", ")));
    }
    if !analysis.tools.is_empty() {
        let names: Vec<&str> = analysis.tools.iter().map(|t| t.name.as_str()).collect();
        lines.push(("Tools", names.join(", ")));
    }
    if !analysis.steps.is_empty() {
        lines.push(("Steps", format!("{} step(s)", analysis.steps.len())));
    }
    lines
}

/// Dashboard data plus client-side filter state.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    tickets: Vec<Ticket>,
    feedback: Vec<FeedbackRecord>,
    ticket_error: Option<String>,
    feedback_error: Option<String>,
    search: String,
    filter: FeedbackFilter,
    selected: Option<i64>,
}

impl Dashboard {
    pub fn new(tickets: Vec<Ticket>, feedback: Vec<FeedbackRecord>) -> Self {
        Self {
            tickets,
            feedback,
            ..Default::default()
        }
    }

    /// Fetch tickets and feedback side by side.
    ///
    /// Each list fails on its own; a failed list is left empty and its error
    /// recorded, while the other still renders.
    pub async fn load(client: &HomieClient) -> Self {
        let (tickets, feedback) = tokio::join!(client.tickets(), client.feedback());
        let mut dashboard = Self::default();

        match tickets {
            Ok(tickets) => dashboard.tickets = tickets,
            Err(e) => {
                error!(error = %e, "Failed to fetch tickets");
                dashboard.ticket_error = Some(e.user_message());
            }
        }
        match feedback {
            Ok(feedback) => dashboard.feedback = feedback,
            Err(e) => {
                error!(error = %e, "Failed to fetch feedback");
                dashboard.feedback_error = Some(e.user_message());
            }
        }

        dashboard
    }

    pub fn ticket_error(&self) -> Option<&str> {
        self.ticket_error.as_deref()
    }

    pub fn feedback_error(&self) -> Option<&str> {
        self.feedback_error.as_deref()
    }

    /// Nothing could be loaded at all.
    pub fn load_failed(&self) -> bool {
        self.ticket_error.is_some() && self.feedback_error.is_some()
    }

    /// Page-level error, shown instead of the panels when both fetches failed.
    pub fn load_error(&self) -> Option<&'static str> {
        self.load_failed().then_some(LOAD_FAILED_MESSAGE)
    }

    pub fn total_tickets(&self) -> usize {
        self.tickets.len()
    }

    pub fn stats(&self) -> FeedbackStats {
        FeedbackStats::from_records(&self.feedback)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn filter(&self) -> FeedbackFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FeedbackFilter) {
        self.filter = filter;
    }

    /// Case-insensitive match on description or email.
    pub fn filtered_tickets(&self) -> Vec<&Ticket> {
        let needle = self.search.to_lowercase();
        self.tickets
            .iter()
            .filter(|t| {
                t.description.to_lowercase().contains(&needle)
                    || t
                        .user_email
                        .as_ref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn filtered_feedback(&self) -> Vec<&FeedbackRecord> {
        self.feedback.iter().filter(|r| self.filter.matches(r)).collect()
    }

    pub fn ticket_feedback(&self, ticket_id: i64) -> Vec<&FeedbackRecord> {
        self.feedback.iter().filter(|r| r.ticket_id == ticket_id).collect()
    }

    /// Scope the feedback panel to one ticket.
    ///
    /// There is no way to clear a selection; only an unknown id is refused.
    pub fn select(&mut self, ticket_id: i64) -> bool {
        if self.tickets.iter().any(|t| t.id == ticket_id) {
            self.selected = Some(ticket_id);
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&Ticket> {
        self.selected
            .and_then(|id| self.tickets.iter().find(|t| t.id == id))
    }

    /// Heading of the selected ticket's detail panel.
    pub fn details_title(&self) -> Option<String> {
        self.selected().map(|t| format!("Ticket #{} Details", t.id))
    }

    pub fn feedback_title(&self) -> String {
        match self.selected {
            Some(id) => format!("Feedback for Ticket #{}", id),
            None => format!("All Feedback ({})", self.filtered_feedback().len()),
        }
    }

    /// Feedback shown in the right-hand panel.
    pub fn feedback_panel(&self) -> Vec<&FeedbackRecord> {
        match self.selected {
            Some(id) => self.ticket_feedback(id),
            None => self.filtered_feedback(),
        }
    }

    pub fn ticket_feedback_count(&self, ticket_id: i64) -> usize {
        self.feedback.iter().filter(|r| r.ticket_id == ticket_id).count()
    }

    pub fn empty_feedback_text(&self) -> &'static str {
        if self.selected.is_some() {
            "No feedback for this ticket"
        } else {
            "No feedback found"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(id: i64, description: &str, email: Option<&str>) -> Ticket {
        Ticket {
            id,
            created_at: Utc.with_ymd_and_hms(2025, 3, id as u32, 9, 0, 0).unwrap(),
            status: "completed".to_string(),
            user_email: email.map(str::to_string),
            description: description.to_string(),
            latest_analysis: None,
        }
    }

    fn feedback(id: i64, ticket_id: i64, kind: &str) -> FeedbackRecord {
        FeedbackRecord {
            id,
            ticket_id,
            feedback_type: kind.to_string(),
            feedback_text: None,
            user_email: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(
            vec![
                ticket(1, "Caulk around tub is peeling", Some("Pat@Example.com")),
                ticket(2, "Install a ceiling fan", None),
                ticket(3, "Patch drywall hole", Some("sam@example.com")),
            ],
            vec![
                feedback(10, 1, "helpful"),
                feedback(11, 1, "not-helpful"),
                feedback(12, 2, "helpful"),
            ],
        )
    }

    #[test]
    fn test_search_is_case_insensitive_on_description_and_email() {
        let mut dash = dashboard();
        dash.set_search("CAULK");
        assert_eq!(dash.filtered_tickets().len(), 1);

        dash.set_search("pat@example");
        let ids: Vec<i64> = dash.filtered_tickets().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);

        dash.set_search("");
        assert_eq!(dash.filtered_tickets().len(), 3);
    }

    #[test]
    fn test_feedback_filter() {
        let mut dash = dashboard();
        dash.set_filter(FeedbackFilter::NotHelpful);
        let ids: Vec<i64> = dash.filtered_feedback().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![11]);
        assert_eq!(dash.feedback_title(), "All Feedback (1)");
    }

    #[test]
    fn test_selection_scopes_feedback_panel() {
        let mut dash = dashboard();
        dash.set_filter(FeedbackFilter::Helpful);
        assert!(dash.select(1));

        let ids: Vec<i64> = dash.feedback_panel().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(dash.feedback_title(), "Feedback for Ticket #1");

        assert!(dash.select(3));
        assert!(dash.feedback_panel().is_empty());
        assert_eq!(dash.empty_feedback_text(), "No feedback for this ticket");

        assert!(!dash.select(99));
        assert_eq!(dash.selected().map(|t| t.id), Some(3));
    }

    #[test]
    fn test_stats() {
        let stats = dashboard().stats();
        assert_eq!(stats.helpful, 2);
        assert_eq!(stats.not_helpful, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.helpful_rate_display(), "66.7%");
    }

    #[test]
    fn test_stats_without_feedback() {
        let stats = FeedbackStats::from_records(&[]);
        assert_eq!(stats.helpful_rate(), 0.0);
        assert_eq!(stats.helpful_rate_display(), "0.0%");
    }

    #[test]
    fn test_load_error_only_when_both_lists_failed() {
        let mut dash = dashboard();
        dash.ticket_error = Some("Failed to fetch tickets".to_string());
        assert_eq!(dash.load_error(), None);

        dash.feedback_error = Some("Failed to fetch feedback".to_string());
        assert_eq!(dash.load_error(), Some("Failed to load admin data"));
    }

    #[test]
    fn test_ticket_feedback_count() {
        let dash = dashboard();
        assert_eq!(dash.ticket_feedback_count(1), 2);
        assert_eq!(dash.ticket_feedback_count(3), 0);
    }

    fn stored_analysis(steps: usize) -> TicketAnalysis {
        serde_json::from_value(serde_json::json!({
            "id": 5,
            "ticket_id": 1,
            "materials": [{ "name": "Silicone caulk" }, { "name": "Painter's tape" }],
            "tools": [],
            "steps": vec!["step"; steps],
            "created_at": "2025-03-01T09:05:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_analysis_summary_skips_empty_parts() {
        let summary = analysis_summary(&stored_analysis(3));
        assert_eq!(
            summary,
            vec![
                ("Materials", "Silicone caulk, Painter's tape".to_string()),
                ("Steps", "3 step(s)".to_string()),
            ]
        );

        assert_eq!(analysis_summary(&stored_analysis(0)).len(), 1);
    }

    #[test]
    fn test_details_title_follows_selection() {
        let mut dash = dashboard();
        assert_eq!(dash.details_title(), None);
        dash.select(2);
        assert_eq!(dash.details_title().as_deref(), Some("Ticket #2 Details"));
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("not-helpful".parse::<FeedbackFilter>().unwrap(), FeedbackFilter::NotHelpful);
        assert!("sometimes".parse::<FeedbackFilter>().is_err());
    }
}
