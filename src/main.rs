//! # GA Popular Report
//!
//! Builds the "popular articles" and "popular videos" lists for the website
//! front end from page-view analytics, and publishes both as JSON documents
//! to Cloud Storage.
//!
//! ## Usage
//!
//! ```sh
//! # Serve the trigger endpoint (GET /generate_popular_report)
//! ga_popular_report serve --port 8000
//!
//! # Generate and publish once
//! ga_popular_report run
//! ```
//!
//! ## Architecture
//!
//! Each run is a single linear pass:
//! 1. **Analytics**: Fetch page views for the last two days from GA4
//! 2. **Extraction**: Pick story slugs out of the page paths, in view order
//! 3. **Resolution**: Look the slugs up in the content service (one batched query)
//! 4. **Assembly**: Cap at 30 articles and 11 deduplicated videos
//! 5. **Publishing**: Write `popularlist.json` and `popular-videonews-list.json`

use clap::Parser;
use std::error::Error;
use std::net::SocketAddr;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analytics;
mod cli;
mod config;
mod content;
mod error;
mod google_auth;
mod graphql;
mod http;
mod models;
mod outputs;
mod pipeline;
mod report;
mod slugs;
mod storage;
mod utils;

use cli::{Cli, Command};
use config::ReportConfig;
use pipeline::{RunStatus, run_once};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(command = ?args.selected_command(), config = ?args.config, "Parsed CLI arguments");

    let config = match ReportConfig::load(&args).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        bucket = %config.bucket,
        gcs_path = %config.gcs_path,
        strategy = ?config.resolve_strategy,
        "Configuration loaded"
    );

    match args.selected_command() {
        Command::Run => {
            let status = run_once(&config).await;
            println!("{status}");
            if status == RunStatus::Failed {
                std::process::exit(1);
            }
        }
        Command::Serve => {
            let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
            let app = http::create_router(http::AppState::new(config));

            info!(%addr, "Serving popular report trigger");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
