//! Terminal output helpers shared by every route.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use shared::PhaseKind;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

pub fn print_error(msg: &str) {
    println!("{} {}", style("✗").red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", style("!").yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue(), msg);
}

pub fn heading(text: &str) {
    println!();
    println!("{}", style(text).bold().underlined());
}

pub fn title(text: &str) {
    println!();
    println!("{}", style(text).cyan().bold());
    println!("{}", style("─".repeat(text.chars().count())).cyan());
}

/// Shorten `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut.trim_end())
    }
}

pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
    pb.set_style(spinner_style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Show a spinner for every loading phase until the session goes away.
pub fn spawn_phase_spinner(mut phases: watch::Receiver<PhaseKind>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut spinner: Option<ProgressBar> = None;
        while phases.changed().await.is_ok() {
            let phase = *phases.borrow_and_update();
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
            if let Some(message) = phase.loading_message() {
                spinner = Some(create_spinner(message));
            }
        }
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Caulk around the tub is peeling", 12), "Caulk aro...");
        assert_eq!(truncate("two\nlines", 20), "two lines");
    }

    #[test]
    fn test_spinner_carries_message() {
        let pb = create_spinner("Loading admin data...");
        assert_eq!(pb.message(), "Loading admin data...");
        pb.finish_and_clear();
    }
}
