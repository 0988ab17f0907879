//! Result page rendering.

use console::style;
use shared::results::{LikelihoodEntry, ResultView};
use shared::Ticket;

use crate::ui::{heading, title, truncate};

const BAR_WIDTH: usize = 30;

pub fn likelihood_bar(entry: &LikelihoodEntry) -> String {
    let filled = (entry.value as usize * BAR_WIDTH + 50) / 100;
    format!(
        "{:<24} {}{} {:>3}%",
        truncate(&entry.label, 24),
        style("█".repeat(filled)).green(),
        style("░".repeat(BAR_WIDTH - filled)).dim(),
        entry.value
    )
}

pub fn result(view: &ResultView) {
    title(&format!("Your Repair Plan (Ticket #{})", view.ticket_id));

    if !view.likelihood.is_empty() {
        heading("Most Likely Causes");
        for entry in &view.likelihood {
            println!("  {}", likelihood_bar(entry));
        }
    }

    if !view.materials.is_empty() {
        heading("Materials");
        for material in &view.materials {
            let qty = material
                .qty
                .as_deref()
                .map(|q| format!(" ({})", q))
                .unwrap_or_default();
            println!("  • {}{}", style(&material.name).bold(), qty);
            if let Some(spec) = &material.spec {
                println!("    {}", style(spec).dim());
            }
            if let Some(description) = &material.description {
                println!("    {}", description);
            }
            if !material.alternatives.is_empty() {
                println!("    Alternatives: {}", material.alternatives.join(", "));
            }
            if let Some(price) = &material.price {
                println!("    {}", style(price).green());
            }
            if let Some(url) = &material.product_url {
                println!("    Buy: {}", style(url).underlined());
            }
            if let Some(url) = &material.image_url {
                println!("    Image: {}", style(url).dim());
            }
        }
    }

    if !view.tools.is_empty() {
        heading("Tools");
        for tool in &view.tools {
            println!("  • {}", style(&tool.name).bold());
            if let Some(purpose) = &tool.purpose {
                println!("    {}", style(purpose).dim());
            }
            if let Some(description) = &tool.description {
                println!("    {}", description);
            }
            if let Some(price) = &tool.price {
                println!("    {}", style(price).green());
            }
            if let Some(url) = &tool.product_url {
                println!("    Buy: {}", style(url).underlined());
            }
            if let Some(url) = &tool.image_url {
                println!("    Image: {}", style(url).dim());
            }
        }
    }

    if !view.steps.is_empty() {
        heading("Steps");
        for (i, step) in view.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }

    if !view.safety.is_empty() {
        heading("Safety Notes");
        for note in &view.safety {
            println!("  {} {}", style("⚠").yellow(), note);
        }
    }

    if !view.videos.is_empty() {
        heading(view.video_heading());
        for video in &view.videos {
            println!("  ▶ {}", style(&video.title).bold());
            let meta: Vec<&str> = [&video.channel, &video.views, &video.duration]
                .into_iter()
                .filter_map(|v| v.as_deref())
                .collect();
            if !meta.is_empty() {
                println!("    {}", style(meta.join(" · ")).dim());
            }
            println!("    {}", style(&video.url).underlined());
            if let Some(thumbnail) = &video.thumbnail {
                println!("    Thumbnail: {}", style(thumbnail).dim());
            }
        }
    }
    println!();
}

pub fn recent_projects(tickets: &[Ticket]) {
    if tickets.is_empty() {
        return;
    }
    heading("Recent Projects");
    for ticket in tickets {
        println!(
            "  #{:<5} {}  {}  {}",
            ticket.id,
            style(shared::admin::format_date(&ticket.created_at)).dim(),
            truncate(&ticket.description, 50),
            style(&ticket.status).cyan()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_likelihood_bar_width() {
        console::set_colors_enabled(false);
        let bar = likelihood_bar(&LikelihoodEntry {
            label: "Caulk Failure".to_string(),
            value: 50,
        });
        assert_eq!(bar.matches('█').count(), 15);
        assert_eq!(bar.matches('░').count(), 15);
        assert!(bar.ends_with(" 50%"));
    }
}
