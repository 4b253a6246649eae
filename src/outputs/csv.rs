//! CSV export of the run's accumulated rows.
//!
//! The file carries a leading unnamed row-index column followed by
//! `date`, `headline`, `link`. A rejected link is an empty field.

use crate::error::Result;
use crate::models::ArchiveRow;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Serialize)]
struct CsvRecord<'a> {
    #[serde(rename = "")]
    index: usize,
    date: String,
    headline: &'a str,
    link: Option<&'a str>,
}

/// Render `rows` as CSV text, header included.
///
/// The header is written even when `rows` is empty.
pub fn rows_to_csv(rows: &[ArchiveRow]) -> Result<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record(["", "date", "headline", "link"])?;
    }
    for (index, row) in rows.iter().enumerate() {
        writer.serialize(CsvRecord {
            index,
            date: row.date.format("%Y-%m-%d").to_string(),
            headline: &row.headline,
            link: row.link.as_deref(),
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

/// Write `rows` to `path`, creating parent directories as needed.
///
/// # Arguments
///
/// * `rows` - The run's accumulated rows, in harvest order
/// * `path` - Destination file, usually `news.csv`; overwritten if present
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation,
/// or the file write fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = rows.len()))]
pub async fn write_news_csv(rows: &[ArchiveRow], path: &Path) -> Result<()> {
    let bytes = rows_to_csv(rows)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, bytes).await?;
    info!("Wrote harvested rows");
    Ok(())
}
