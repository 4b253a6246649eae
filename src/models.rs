//! Data models shared across the crawl pipeline.
//!
//! - [`RawAnchor`]: an anchor as read off the archive page
//! - [`ArchiveRow`]: one extracted headline, tagged with its archive date
//! - [`CrawlWindow`]: the crawl's lower bound and its moving cursor

use crate::dates::next_day;
use crate::error::{CrawlError, Result};
use chrono::NaiveDate;

/// An anchor element inside the headline container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnchor {
    /// Visible text, all descendant text nodes concatenated.
    pub text: String,
    /// The `href` attribute, empty when the anchor has none.
    pub href: String,
}

impl RawAnchor {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }
}

/// One headline from a day's archive page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRow {
    /// The archive date the headline was listed under.
    pub date: NaiveDate,
    pub headline: String,
    /// Normalized article URL; `None` when the raw link was rejected.
    pub link: Option<String>,
}

/// The crawl's exclusive lower bound and the next day to crawl.
///
/// The cursor never moves backwards and never precedes `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlWindow {
    start: NaiveDate,
    cursor: NaiveDate,
}

impl CrawlWindow {
    /// A window whose cursor sits at `cursor`, which must not precede `start`.
    pub fn new(start: NaiveDate, cursor: NaiveDate) -> Result<Self> {
        if cursor < start {
            return Err(CrawlError::InvalidDateArg(format!(
                "cursor {cursor} precedes start date {start}"
            )));
        }
        Ok(Self { start, cursor })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    /// Move the cursor forward one whole day.
    pub fn advance(&mut self) -> NaiveDate {
        self.cursor = next_day(self.cursor);
        self.cursor
    }
}
