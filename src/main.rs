mod fetcher;
mod parser;
mod pipeline;
mod record;
mod settings;
mod writer;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fetcher::HttpFetcher;
use settings::{Overrides, Settings};

/// Every flag is optional; with none, the public listing is scraped into
/// data/daftar_pengadilan.csv. PUTUSAN_* environment variables sit between
/// the defaults and these flags.
#[derive(Parser)]
#[command(
    name = "putusan_scraper",
    about = "Scrape the Mahkamah Agung court directory to CSV",
    after_help = "Environment (overridden by the flags above):\n  \
                  PUTUSAN_BASE_URL, PUTUSAN_OUTPUT, PUTUSAN_TIMEOUT_SECS, PUTUSAN_MAX_ATTEMPTS,\n  \
                  PUTUSAN_BACKOFF_BASE_MS, PUTUSAN_BACKOFF_MAX_MS, PUTUSAN_LOG_FILTER\n\
                  RUST_LOG, when set, replaces the log filter."
)]
struct Cli {
    /// Listing URL (page 1)
    #[arg(long)]
    base_url: Option<String>,
    /// CSV output path
    #[arg(short, long)]
    output: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Attempts per page before giving up
    #[arg(long)]
    max_attempts: Option<u32>,
    /// Initial backoff between attempts in ms (0 = retry immediately)
    #[arg(long)]
    backoff_ms: Option<u64>,
    /// Log filter, e.g. "info" or "putusan_scraper=debug"
    #[arg(long)]
    log: Option<String>,
}

impl Cli {
    fn overrides(self) -> Overrides {
        Overrides {
            base_url: self.base_url,
            output: self.output,
            timeout_secs: self.timeout,
            max_attempts: self.max_attempts,
            backoff_base_ms: self.backoff_ms,
            log_filter: self.log,
        }
    }
}

/// RUST_LOG wins over the configured filter when set.
fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let t0 = Instant::now();
    let settings = Settings::load(&Cli::parse().overrides())?;
    init_tracing(&settings.log_filter);

    let from_env = settings::env_keys(std::env::vars());
    if !from_env.is_empty() {
        info!("Settings taken from environment: {}", from_env.join(", "));
    }

    info!(
        base_url = %settings.base_url,
        output = %settings.output.display(),
        max_attempts = settings.max_attempts,
        "Starting court directory scrape"
    );

    let fetcher = HttpFetcher::new(settings.timeout(), settings.retry_policy())?;
    let summary = pipeline::run(&fetcher, &settings)?;

    let output = summary
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "no file written".into());
    info!(
        "Done in {:.1}s: {} page(s), {} failed, {} record(s), {}",
        t0.elapsed().as_secs_f64(),
        summary.pages_total,
        summary.pages_failed,
        summary.records,
        output
    );
    Ok(())
}
