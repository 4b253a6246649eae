//! Archive URL construction and article link repair.
//!
//! # URL Pattern
//!
//! Each day's archive index lives at
//! `http://timesofindia.indiatimes.com/{y}/{m}/{d}/archivelist/year-{y},month-{m},starttime-{n}.cms`
//! where `{n}` is the site's day-count for that date, e.g.
//! `http://timesofindia.indiatimes.com/2019/2/7/archivelist/year-2019,month-2,starttime-43503.cms`.

use crate::dates::{Clock, DateBoundary};
use chrono::NaiveDate;

/// Canonical site root that relative article links are resolved against.
pub const SITE_ROOT: &str = "http://timesofindia.indiatimes.com/";
/// Scheme prefix an absolute article link must start with.
pub const URL_SCHEME: &str = "http://";
/// Domain fragment an absolute article link must contain.
pub const SITE_DOMAIN: &str = ".indiatimes.com/";
/// Suffix of every article page.
pub const ARTICLE_SUFFIX: &str = ".cms";
/// A relative link containing this marker embeds another URL and is rejected.
const NESTED_SCHEME_MARKER: &str = "http";

/// Offset added to the days elapsed since 1900-01-01 to get the site's
/// day-count. Empirical; it matches the site's numbering and is not derived.
pub const DAY_COUNT_OFFSET: i64 = 2;

fn day_count_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("1900-01-01 is a valid date")
}

/// The site's day-count parameter for `date`.
pub fn day_count(date: NaiveDate) -> i64 {
    (date - day_count_epoch()).num_days() + DAY_COUNT_OFFSET
}

/// Format the archive index URL for `date` without any validity check.
pub fn format_archive_url(date: NaiveDate) -> String {
    use chrono::Datelike;

    let (year, month, day) = (date.year(), date.month(), date.day());
    format!(
        "{SITE_ROOT}{year}/{month}/{day}/archivelist/year-{year},month-{month},starttime-{count}.cms",
        count = day_count(date),
    )
}

/// The archive index URL for `date`, or `None` if the date is unpublished or
/// not after the crawl's lower bound.
pub fn archive_url_for<C: Clock>(boundary: &DateBoundary<C>, date: NaiveDate) -> Option<String> {
    if !boundary.is_valid_date(date) {
        return None;
    }
    Some(format_archive_url(date))
}

/// Accept, repair, or reject a raw `href` from the archive page.
///
/// - Absolute links on the site (`http://` + `.indiatimes.com/`) pass through.
/// - Otherwise a link ending in `.cms` with no embedded scheme and no
///   whitespace is treated as path-relative and prefixed with [`SITE_ROOT`].
/// - Anything else is malformed or injected markup and is dropped.
pub fn normalize_link(raw: &str) -> Option<String> {
    if raw.starts_with(URL_SCHEME) && raw.contains(SITE_DOMAIN) {
        return Some(raw.to_string());
    }
    if !raw.ends_with(ARTICLE_SUFFIX)
        || raw.contains(NESTED_SCHEME_MARKER)
        || raw.chars().any(char::is_whitespace)
    {
        return None;
    }
    Some(format!("{SITE_ROOT}{raw}"))
}
