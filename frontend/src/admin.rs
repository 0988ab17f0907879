//! Admin route: read-only tickets and feedback overview.

use clap::Args;
use console::style;
use shared::admin::{analysis_summary, format_date, Dashboard, FeedbackFilter, NO_TICKETS_MESSAGE};
use shared::HomieClient;

use crate::ui::{create_spinner, heading, print_error, print_warning, title, truncate};

#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Filter tickets by description or email
    #[arg(long, short)]
    pub search: Option<String>,

    /// Feedback filter: all, helpful or not-helpful
    #[arg(long, short, default_value = "all")]
    pub filter: FeedbackFilter,

    /// Show only the feedback for this ticket
    #[arg(long, short)]
    pub ticket: Option<i64>,
}

pub async fn run(client: &HomieClient, args: AdminArgs) -> anyhow::Result<()> {
    let spinner = create_spinner("Loading admin data...");
    let mut dashboard = Dashboard::load(client).await;
    spinner.finish_and_clear();
    title("Admin Dashboard");

    if let Some(message) = dashboard.load_error() {
        print_error(message);
        return Ok(());
    }

    if let Some(search) = args.search {
        dashboard.set_search(search);
    }
    dashboard.set_filter(args.filter);
    if let Some(id) = args.ticket {
        if !dashboard.select(id) {
            print_warning(&format!("Ticket #{} not found", id));
        }
    }

    stats(&dashboard);
    tickets(&dashboard);
    feedback(&dashboard);
    ticket_details(&dashboard);
    Ok(())
}

fn stats(dashboard: &Dashboard) {
    let stats = dashboard.stats();
    println!(
        "Total Tickets: {}   Helpful: {}   Not Helpful: {}   Helpful Rate: {}",
        style(dashboard.total_tickets()).bold(),
        style(stats.helpful).green().bold(),
        style(stats.not_helpful).red().bold(),
        style(stats.helpful_rate_display()).bold()
    );
}

fn tickets(dashboard: &Dashboard) {
    heading(&format!("Tickets ({})", dashboard.filtered_tickets().len()));
    if let Some(error) = dashboard.ticket_error() {
        print_error(error);
        return;
    }

    let tickets = dashboard.filtered_tickets();
    if tickets.is_empty() {
        println!("  {}", style(NO_TICKETS_MESSAGE).dim());
        return;
    }

    let selected = dashboard.selected().map(|t| t.id);
    for ticket in tickets {
        let marker = if selected == Some(ticket.id) { "▶" } else { " " };
        let count = dashboard.ticket_feedback_count(ticket.id);
        let badge = if count > 0 {
            format!(" [{} feedback]", count)
        } else {
            String::new()
        };
        println!(
            "{} #{:<5} {}  {}{}",
            marker,
            ticket.id,
            style(format_date(&ticket.created_at)).dim(),
            style(&ticket.status).cyan(),
            style(badge).yellow()
        );
        println!("         {}", truncate(&ticket.description, 70));
        if let Some(email) = &ticket.user_email {
            println!("         {}", style(email).dim());
        }
    }
}

fn feedback(dashboard: &Dashboard) {
    heading(&dashboard.feedback_title());
    if let Some(error) = dashboard.feedback_error() {
        print_error(error);
        return;
    }

    let records = dashboard.feedback_panel();
    if records.is_empty() {
        println!("  {}", style(dashboard.empty_feedback_text()).dim());
        return;
    }

    for record in records {
        let label = match record.kind() {
            Some(shared::FeedbackType::Helpful) => style("Helpful").green(),
            Some(shared::FeedbackType::NotHelpful) => style("Not Helpful").red(),
            None => style(record.feedback_type.as_str()).dim(),
        };
        println!(
            "  {} Ticket #{}  {}",
            label,
            record.ticket_id,
            style(format_date(&record.created_at)).dim()
        );
        if let Some(text) = &record.feedback_text {
            println!("    \"{}\"", text);
        }
        if let Some(email) = &record.user_email {
            println!("    {}", style(email).dim());
        }
    }
}

fn ticket_details(dashboard: &Dashboard) {
    let (Some(ticket), Some(heading_text)) = (dashboard.selected(), dashboard.details_title()) else {
        return;
    };

    heading(&heading_text);
    println!("  {}", style("Description").bold());
    println!("    {}", ticket.description);
    println!("  {}", style("Details").bold());
    println!("    Status:  {}", ticket.status);
    println!("    Created: {}", format_date(&ticket.created_at));
    if let Some(email) = &ticket.user_email {
        println!("    Email:   {}", email);
    }

    if let Some(analysis) = &ticket.latest_analysis {
        println!("  {}", style("Analysis Summary").bold());
        for (label, value) in analysis_summary(analysis) {
            println!("    {}: {}", style(label).dim(), value);
        }
    }
}
