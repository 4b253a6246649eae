//! The date-cursor crawl driver.
//!
//! Each [`CrawlScheduler::step`] does two things:
//!
//! 1. **Catch-up**: while the cursor is still short of the target date and
//!    already published, sleep toward the publisher's next midnight (capped by
//!    `max_sleep`) and move the cursor forward one day.
//! 2. **Fetch**: make exactly one attempt to harvest the cursor's archive page.
//!    Rows advance the cursor; an empty page (or an unpublished date) pauses
//!    for [`RETRY_PAUSE`] and leaves the cursor where it is.
//!
//! Continuous crawling is repeated stepping. [`CrawlScheduler::run`] loops
//! forever unless given an attempt limit, so a long-running harvester only
//! stops on shutdown or a fatal error.

use crate::dates::{Clock, DateBoundary, next_day};
use crate::error::Result;
use crate::extract::extract_rows;
use crate::models::{ArchiveRow, CrawlWindow};
use crate::scrapers::archive::{PageSource, fetch_anchors};
use crate::urls::archive_url_for;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Pause after an attempt that produced no rows.
pub const RETRY_PAUSE: Duration = Duration::from_secs(10);

const SECONDS_PER_DAY: i64 = 86_400;

/// Suspension seam so tests can observe requested pauses without waiting.
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Blocks the crawl task on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// What a single step did with the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Rows were harvested for `date` and the cursor moved past it.
    Advanced { date: NaiveDate, rows: usize },
    /// Nothing was harvested for `date`; the step paused for `pause`.
    Retry { date: NaiveDate, pause: Duration },
}

/// Totals for a [`CrawlScheduler::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub attempts: u64,
    pub advanced: u64,
    pub retries: u64,
}

/// Seconds to sleep before `until`, seen from `boundary`.
///
/// This is the seconds component of the signed day/second difference, so it
/// always lands in `0..86400` even when `until` is already behind `boundary`.
pub fn catch_up_seconds(until: NaiveDateTime, boundary: NaiveDateTime) -> u64 {
    let delta: TimeDelta = until - boundary;
    let mut whole = delta.num_seconds();
    if delta.subsec_nanos() < 0 {
        whole -= 1;
    }
    whole.rem_euclid(SECONDS_PER_DAY) as u64
}

#[derive(Debug)]
pub struct CrawlScheduler<S, C, Z> {
    boundary: DateBoundary<C>,
    source: S,
    sleeper: Z,
    /// Catch-up runs toward this date before fetching.
    target: NaiveDate,
    /// Cap on any single catch-up sleep, in seconds.
    max_sleep: u64,
}

impl<S, C, Z> CrawlScheduler<S, C, Z>
where
    S: PageSource,
    C: Clock,
    Z: Sleeper,
{
    pub fn new(boundary: DateBoundary<C>, source: S, sleeper: Z, target: NaiveDate, max_sleep: u64) -> Self {
        Self {
            boundary,
            source,
            sleeper,
            target,
            max_sleep,
        }
    }

    /// Fetch and extract the archive rows for `date`.
    ///
    /// An unpublished or out-of-range date yields no rows without touching the
    /// network.
    #[instrument(level = "info", skip(self))]
    pub async fn harvest_day(&self, date: NaiveDate) -> Result<Vec<ArchiveRow>> {
        info!("Getting articles for the day");
        let Some(url) = archive_url_for(&self.boundary, date) else {
            info!("Date not yet publishable or before the start date");
            return Ok(Vec::new());
        };
        let anchors = fetch_anchors(&self.source, &url).await?;
        Ok(extract_rows(&anchors, date))
    }

    async fn catch_up(&self, window: &mut CrawlWindow) {
        while window.cursor() != self.target && self.boundary.is_valid_date(window.cursor()) {
            let until = next_day(window.cursor()).and_time(NaiveTime::MIN);
            let secs = catch_up_seconds(until, self.boundary.publish_boundary_now());
            info!(seconds = secs, target = %self.target, "Reached the end, waiting for the next day");

            if secs <= self.max_sleep {
                self.sleeper.sleep(Duration::from_secs(secs)).await;
            } else {
                info!(
                    seconds = secs,
                    max_sleep = self.max_sleep,
                    "Seconds till next day exceed the cap, sleeping for the cap only"
                );
                self.sleeper.sleep(Duration::from_secs(self.max_sleep)).await;
            }

            info!("Woken up, moving the cursor");
            let cursor = window.advance();
            info!(%cursor, "New date set");
        }
    }

    /// Catch up, then make one fetch attempt for the cursor date.
    ///
    /// Harvested rows are appended to `harvest`. A
    /// [`StructuralMismatch`](crate::error::CrawlError::StructuralMismatch) or
    /// transport error propagates with the cursor unchanged.
    pub async fn step(&self, window: &mut CrawlWindow, harvest: &mut Vec<ArchiveRow>) -> Result<StepOutcome> {
        self.catch_up(window).await;

        let date = window.cursor();
        info!(%date, "Retrieving articles");
        let rows = self.harvest_day(date).await?;
        info!(rows = rows.len(), "Retrieved rows from the archive");

        if rows.is_empty() {
            info!(pause_secs = RETRY_PAUSE.as_secs(), "No rows retrieved, pausing");
            self.sleeper.sleep(RETRY_PAUSE).await;
            return Ok(StepOutcome::Retry {
                date,
                pause: RETRY_PAUSE,
            });
        }

        let count = rows.len();
        harvest.extend(rows);
        let cursor = window.advance();
        info!(%cursor, "Iterated to next day");
        Ok(StepOutcome::Advanced { date, rows: count })
    }

    /// Step repeatedly, stopping after `max_attempts` steps if given.
    ///
    /// Without a limit this only returns on error; callers bound it with
    /// cancellation instead.
    pub async fn run(
        &self,
        window: &mut CrawlWindow,
        harvest: &mut Vec<ArchiveRow>,
        max_attempts: Option<u64>,
    ) -> Result<RunStats> {
        let mut stats = RunStats::default();
        while !max_attempts.is_some_and(|max| stats.attempts >= max) {
            match self.step(window, harvest).await? {
                StepOutcome::Advanced { date, rows } => {
                    debug!(%date, rows, "Day harvested");
                    stats.advanced += 1;
                }
                StepOutcome::Retry { date, pause } => {
                    debug!(%date, ?pause, "Day retried");
                    stats.retries += 1;
                }
            }
            stats.attempts += 1;
        }
        info!(?stats, "Crawl attempts exhausted");
        Ok(stats)
    }
}
