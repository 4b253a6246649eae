//! Turn the anchors of one archive page into [`ArchiveRow`]s.

use crate::models::{ArchiveRow, RawAnchor};
use crate::urls::normalize_link;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info};

/// Extract one row per anchor with non-empty visible text, tagged with `date`.
///
/// Links are passed through [`normalize_link`]; a rejected link still yields a
/// row with `link: None`.
///
/// Headlines seen earlier on the page are tracked, but the seen-set never
/// gates emission: a repeat is still emitted (and logged at `debug` when its
/// link is valid). Callers that want one row per headline must dedupe
/// themselves.
///
/// # Arguments
///
/// * `anchors` - Anchors of the page's headline container, in page order
/// * `date` - The archive date the page was requested for
///
/// # Returns
///
/// One [`ArchiveRow`] per anchor with visible text, in page order.
pub fn extract_rows(anchors: &[RawAnchor], date: NaiveDate) -> Vec<ArchiveRow> {
    let mut seen_titles: HashSet<&str> = HashSet::new();
    let mut rows = Vec::with_capacity(anchors.len());

    for anchor in anchors.iter().filter(|a| !a.text.is_empty()) {
        let link = normalize_link(&anchor.href);
        if link.is_some() && seen_titles.contains(anchor.text.as_str()) {
            debug!(headline = %anchor.text, "Repeated headline on page");
        }
        seen_titles.insert(&anchor.text);
        rows.push(ArchiveRow {
            date,
            headline: anchor.text.clone(),
            link,
        });
    }

    info!(rows = rows.len(), %date, "Finished parsing");
    rows
}
