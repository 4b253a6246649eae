//! Harvest configuration: YAML file values overlaid with CLI flags.
//!
//! ```yaml
//! max_entries: 1000
//! min_entries: 0
//! max_sleep: 3600
//! init_date: 2022-08-01
//! iter_date: 2022-08-01
//! output: news.csv
//! request_timeout: 30
//! ```

use crate::cli::Cli;
use crate::dates::{next_day, parse_date};
use crate::error::{CrawlError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_OUTPUT: &str = "news.csv";
pub const DEFAULT_MAX_SLEEP_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
const DEFAULT_DATE: (i32, u32, u32) = (2022, 8, 1);

/// Settings as written in the YAML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub max_entries: Option<usize>,
    pub min_entries: Option<usize>,
    pub max_sleep: Option<u64>,
    pub init_date: Option<String>,
    pub iter_date: Option<String>,
    pub start_date: Option<String>,
    pub output: Option<String>,
    pub request_timeout: Option<u64>,
    pub max_attempts: Option<u64>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Accepted for compatibility; no crawl logic reads it.
    pub max_entries: usize,
    /// Accepted for compatibility; no crawl logic reads it.
    pub min_entries: usize,
    /// Cap on any single catch-up sleep, in seconds.
    pub max_sleep: u64,
    /// Exclusive lower bound of the crawl.
    pub init_date: NaiveDate,
    /// Catch-up target.
    pub iter_date: NaiveDate,
    /// Initial cursor.
    pub start_date: NaiveDate,
    pub output: PathBuf,
    pub request_timeout: Duration,
    pub max_attempts: Option<u64>,
}

fn date_arg(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|s| parse_date(s).ok_or_else(|| CrawlError::InvalidDateArg(s.to_string())))
        .transpose()
}

impl HarvestConfig {
    /// Merge `file` and `cli`, CLI first.
    ///
    /// The catch-up target defaults to the starting cursor, so the first
    /// attempt fetches the start day instead of skipping past it. An explicit
    /// target before the starting cursor is rejected: the cursor could never
    /// reach it and every published day would be skipped unfetched.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::InvalidDateArg`] for an unparseable date or a
    /// target that precedes the starting cursor.
    pub fn merge(file: FileConfig, cli: &Cli) -> Result<Self> {
        let (y, m, d) = DEFAULT_DATE;
        let default_date = NaiveDate::from_ymd_opt(y, m, d).expect("default date is valid");

        let init_date = date_arg(cli.init_date.as_deref().or(file.init_date.as_deref()))?.unwrap_or(default_date);
        let start_date = date_arg(cli.start_date.as_deref().or(file.start_date.as_deref()))?
            .unwrap_or_else(|| next_day(init_date));
        let iter_date = match date_arg(cli.iter_date.as_deref().or(file.iter_date.as_deref()))? {
            Some(target) if target < start_date => {
                return Err(CrawlError::InvalidDateArg(format!(
                    "iter date {target} precedes start date {start_date}"
                )));
            }
            Some(target) => target,
            None => default_date.max(start_date),
        };

        Ok(Self {
            max_entries: cli.max_entries.or(file.max_entries).unwrap_or(DEFAULT_MAX_ENTRIES),
            min_entries: cli.min_entries.or(file.min_entries).unwrap_or(0),
            max_sleep: cli.max_sleep.or(file.max_sleep).unwrap_or(DEFAULT_MAX_SLEEP_SECS),
            init_date,
            iter_date,
            start_date,
            output: PathBuf::from(cli.output.clone().or(file.output).unwrap_or_else(|| DEFAULT_OUTPUT.to_string())),
            request_timeout: Duration::from_secs(
                cli.request_timeout
                    .or(file.request_timeout)
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            max_attempts: cli.max_attempts.or(file.max_attempts),
        })
    }

    /// Read the config file named by `cli`, if any, and merge.
    #[instrument(level = "info", skip_all, fields(config = ?cli.config))]
    pub async fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let yaml = tokio::fs::read_to_string(path).await?;
                info!(path, "Loaded configuration file");
                FileConfig::from_yaml(&yaml)?
            }
            None => FileConfig::default(),
        };
        Self::merge(file, cli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("toi_archive_harvester").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = HarvestConfig::merge(FileConfig::default(), &cli(&[])).unwrap();
        assert_eq!(config.init_date, ymd(2022, 8, 1));
        assert_eq!(config.iter_date, ymd(2022, 8, 2));
        assert_eq!(config.start_date, ymd(2022, 8, 2));
        assert_eq!(config.max_sleep, DEFAULT_MAX_SLEEP_SECS);
        assert_eq!(config.output, PathBuf::from("news.csv"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_attempts, None);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig::from_yaml(
            "max_sleep: 120\ninit_date: 2019-02-01\niter_date: 2019-02-07\nmax_entries: 5\n",
        )
        .unwrap();
        let config = HarvestConfig::merge(file, &cli(&["--max-sleep", "60"])).unwrap();
        assert_eq!(config.max_sleep, 60);
        assert_eq!(config.init_date, ymd(2019, 2, 1));
        assert_eq!(config.iter_date, ymd(2019, 2, 7));
        assert_eq!(config.start_date, ymd(2019, 2, 2));
        assert_eq!(config.max_entries, 5);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let err = HarvestConfig::merge(FileConfig::default(), &cli(&["--init-date", "2019-02-30"])).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidDateArg(ref s) if s == "2019-02-30"));
    }

    #[test]
    fn test_target_follows_later_start_date() {
        let config = HarvestConfig::merge(FileConfig::default(), &cli(&["--start-date", "2022-08-20"])).unwrap();
        assert_eq!(config.iter_date, ymd(2022, 8, 20));
    }

    #[test]
    fn test_target_before_start_is_rejected() {
        let err = HarvestConfig::merge(FileConfig::default(), &cli(&["--iter-date", "2022-08-01"])).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidDateArg(ref s) if s.contains("precedes start date 2022-08-02")));
    }

    #[test]
    fn test_unknown_yaml_key_is_rejected() {
        assert!(FileConfig::from_yaml("max_slep: 10\n").is_err());
    }

    #[tokio::test]
    async fn test_load_reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.yaml");
        std::fs::write(&path, "start_date: 2022-08-05\nmax_attempts: 4\n").unwrap();

        let config = HarvestConfig::load(&cli(&["-c", path.to_str().unwrap()])).await.unwrap();
        assert_eq!(config.start_date, ymd(2022, 8, 5));
        assert_eq!(config.max_attempts, Some(4));
    }
}
