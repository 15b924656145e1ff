mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::Settings;
use rtve_core::{
    CsvRow, CsvSink, RtveClient, RtveScraper, Sink, DISCOPOLIS_LISTING_URL, RNE_PROGRAMS_API_URL,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?.with_overrides(cli.delay, cli.user_agent)?;

    let client = RtveClient::with_config(settings.client_config())
        .context("building HTTP client")?;
    let scraper = RtveScraper::with_client(client);

    match cli.command {
        Command::Episodes {
            listing_url,
            output,
        } => {
            let url = listing_url
                .or(settings.listing_url)
                .unwrap_or_else(|| DISCOPOLIS_LISTING_URL.to_string());
            let episodes = scraper
                .crawl_episodes(&url)
                .await
                .with_context(|| format!("crawling {}", url))?;
            write_records(&output, &episodes)?;
        }
        Command::Programs { api_url, output } => {
            let url = api_url
                .or(settings.api_url)
                .unwrap_or_else(|| RNE_PROGRAMS_API_URL.to_string());
            let programs = scraper
                .fetch_programs(&url)
                .await
                .with_context(|| format!("fetching {}", url))?;
            write_records(&output, &programs)?;
        }
    }

    Ok(())
}

/// Write records to a CSV file, replacing any previous file.
///
/// Nothing is written when there are no records.
fn write_records<R: CsvRow>(path: &Path, records: &[R]) -> Result<()> {
    if records.is_empty() {
        tracing::warn!(path = %path.display(), "No records scraped; output file not written");
        return Ok(());
    }

    let mut sink = CsvSink::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for record in records {
        sink.accept(record)?;
    }
    Sink::<R>::finish(&mut sink)?;

    tracing::info!(rows = sink.rows(), path = %path.display(), "Wrote CSV");
    Ok(())
}
