//! HomieFixie terminal client.
//!
//! Routes:
//! - `home` (default) - describe an issue, answer questions, get a plan
//! - `how-it-works`, `contact`, `privacy`, `disclaimer`, `about` - static pages
//! - `admin` - tickets and feedback overview

mod admin;
mod home;
mod pages;
mod render;
mod ui;

use clap::{Parser, Subcommand};
use shared::{config, Config, HomieClient};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "homiefixie", version, about = "AI-powered home repair plans")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "HOMIEFIXIE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    route: Option<Route>,
}

#[derive(Debug, Subcommand)]
enum Route {
    /// Describe an issue and get a repair plan
    Home,
    HowItWorks,
    Contact,
    Privacy,
    Disclaimer,
    About,
    /// Tickets and feedback overview
    Admin(admin::AdminArgs),
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url.filter(|url| !url.trim().is_empty()) {
        config = config.with_api_url(api_url);
    }
    init_tracing(config.log_json);

    let config = config::init(config)?;
    debug!(api_url = %config.api_url, "Resolved backend");

    match cli.route.unwrap_or(Route::Home) {
        Route::Home => home::run(HomieClient::from_global()?).await,
        Route::HowItWorks => {
            pages::show(&pages::HOW_IT_WORKS);
            Ok(())
        }
        Route::Contact => {
            pages::show(&pages::CONTACT);
            Ok(())
        }
        Route::Privacy => {
            pages::show(&pages::PRIVACY);
            Ok(())
        }
        Route::Disclaimer => {
            pages::show(&pages::DISCLAIMER);
            Ok(())
        }
        Route::About => {
            pages::show(&pages::ABOUT);
            Ok(())
        }
        Route::Admin(args) => admin::run(&HomieClient::from_global()?, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_api_url_reads_environment() {
        let command = Cli::command();
        let api_url = command
            .get_arguments()
            .find(|arg| arg.get_id() == "api_url")
            .unwrap();
        assert_eq!(
            api_url.get_env(),
            Some(std::ffi::OsStr::new("HOMIEFIXIE_API_URL"))
        );
    }

    #[test]
    fn test_admin_route_parses_flags() {
        let cli = Cli::try_parse_from([
            "homiefixie",
            "--api-url",
            "http://backend:4000",
            "admin",
            "--filter",
            "not-helpful",
            "--ticket",
            "7",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://backend:4000"));
        match cli.route {
            Some(Route::Admin(args)) => {
                assert_eq!(args.filter, shared::FeedbackFilter::NotHelpful);
                assert_eq!(args.ticket, Some(7));
            }
            other => panic!("unexpected route: {:?}", other),
        }
    }
}
