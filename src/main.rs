//! # TOI Archive Harvester
//!
//! Incrementally harvests the Times of India daily archive index, one day at
//! a time, and writes every headline/link/date triple it finds to a CSV file.
//!
//! ## Usage
//!
//! ```sh
//! toi_archive_harvester --init-date 2022-08-01 --iter-date 2022-08-01 --max-sleep 3600
//! ```
//!
//! ## Architecture
//!
//! 1. **Dates**: the publisher's "not yet published" boundary moves with the
//!    clock (UTC+05:30); no day is requested before it has fully elapsed
//! 2. **URLs**: a date maps to its archive page through the site's day-count
//! 3. **Fetching**: one GET per attempt; the page must have exactly one
//!    headline container or the run aborts
//! 4. **Extraction**: anchors become rows, relative links are repaired
//! 5. **Scheduling**: a cursor date advances on success and pauses on empty
//!    pages, sleeping toward the next publishable day when it is ahead
//! 6. **Output**: rows are flushed to CSV when the run ends, however it ends
//!
//! The crawl has no natural end. It runs until Ctrl-C, a fatal error, or
//! `--max-attempts`.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod error;
mod extract;
mod models;
mod outputs;
mod scheduler;
mod scrapers;
mod urls;

use cli::Cli;
use config::HarvestConfig;
use dates::{DateBoundary, SystemClock};
use models::CrawlWindow;
use outputs::csv::write_news_csv;
use scheduler::{CrawlScheduler, TokioSleeper};
use scrapers::archive::HttpPageSource;

#[tokio::main]
#[instrument]
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

    let start_time = std::time::Instant::now();
    info!("toi_archive_harvester starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = HarvestConfig::load(&args).await?;
    info!(
        max_entries = config.max_entries,
        min_entries = config.min_entries,
        max_sleep = config.max_sleep,
        init_date = %config.init_date,
        iter_date = %config.iter_date,
        start_date = %config.start_date,
        output = %config.output.display(),
        timeout_secs = config.request_timeout.as_secs(),
        max_attempts = ?config.max_attempts,
        "Configuration resolved"
    );

    let mut window = CrawlWindow::new(config.init_date, config.start_date)?;
    let source = HttpPageSource::new(config.request_timeout)?;
    let boundary = DateBoundary::new(window.start(), SystemClock);
    let scheduler = CrawlScheduler::new(boundary, source, TokioSleeper, config.iter_date, config.max_sleep);

    // ---- Crawl until done, interrupted, or failed ----
    let mut harvest = Vec::new();
    let outcome = tokio::select! {
        res = scheduler.run(&mut window, &mut harvest, config.max_attempts) => res.map(Some),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupt received; stopping crawl");
            Ok(None)
        }
    };

    // ---- Output: flush whatever was harvested ----
    let written = write_news_csv(&harvest, &config.output).await;
    if let Err(ref e) = written {
        error!(path = %config.output.display(), error = %e, "Failed writing CSV");
    }

    match outcome {
        Ok(Some(stats)) => info!(
            attempts = stats.attempts,
            advanced = stats.advanced,
            retries = stats.retries,
            "Crawl finished"
        ),
        Ok(None) => info!("Crawl interrupted"),
        Err(e) => {
            if e.is_structural() {
                error!(error = %e, cursor = %window.cursor(), "Archive layout changed; aborting run");
            } else {
                error!(error = %e, cursor = %window.cursor(), "Crawl failed");
            }
            return Err(e.into());
        }
    }
    written?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        rows = harvest.len(),
        cursor = %window.cursor(),
        "Execution complete"
    );

    Ok(())
}
