//! Command-line interface definitions.
//!
//! Every option can also come from the environment or a YAML config file
//! (see [`crate::config`]). Flags win over the file; the file wins over
//! built-in defaults.

use clap::Parser;

/// Harvest headlines from the Times of India daily archive into a CSV file.
///
/// # Examples
///
/// ```sh
/// # Crawl from 2022-08-01 onward, sleeping at most an hour at a time
/// toi_archive_harvester --init-date 2022-08-01 --iter-date 2022-08-01 --max-sleep 3600
///
/// # Settings from a file, ten fetch attempts then exit
/// toi_archive_harvester -c harvest.yaml --max-attempts 10
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "HARVEST_CONFIG")]
    pub config: Option<String>,

    /// Maximum entries to collect (accepted, currently unused)
    #[arg(long, env = "HARVEST_MAX_ENTRIES")]
    pub max_entries: Option<usize>,

    /// Minimum entries to collect (accepted, currently unused)
    #[arg(long, env = "HARVEST_MIN_ENTRIES")]
    pub min_entries: Option<usize>,

    /// Cap on any single catch-up sleep, in seconds
    #[arg(long, env = "HARVEST_MAX_SLEEP")]
    pub max_sleep: Option<u64>,

    /// Crawl lower bound (exclusive), YYYY-MM-DD
    #[arg(long, env = "HARVEST_INIT_DATE")]
    pub init_date: Option<String>,

    /// Date the catch-up phase runs toward, YYYY-MM-DD
    #[arg(long, env = "HARVEST_ITER_DATE")]
    pub iter_date: Option<String>,

    /// First day to crawl, YYYY-MM-DD (defaults to the day after --init-date)
    #[arg(long, env = "HARVEST_START_DATE")]
    pub start_date: Option<String>,

    /// CSV output path
    #[arg(short, long, env = "HARVEST_OUTPUT")]
    pub output: Option<String>,

    /// HTTP request timeout, in seconds
    #[arg(long, env = "HARVEST_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Stop after this many fetch attempts instead of running until interrupted
    #[arg(long, env = "HARVEST_MAX_ATTEMPTS")]
    pub max_attempts: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "toi_archive_harvester",
            "--init-date",
            "2022-08-01",
            "--iter-date",
            "2022-08-05",
            "--max-sleep",
            "600",
            "--max-attempts",
            "3",
        ]);

        assert_eq!(cli.init_date.as_deref(), Some("2022-08-01"));
        assert_eq!(cli.iter_date.as_deref(), Some("2022-08-05"));
        assert_eq!(cli.max_sleep, Some(600));
        assert_eq!(cli.max_attempts, Some(3));
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["toi_archive_harvester", "-c", "/tmp/harvest.yaml", "-o", "/tmp/news.csv"]);

        assert_eq!(cli.config.as_deref(), Some("/tmp/harvest.yaml"));
        assert_eq!(cli.output.as_deref(), Some("/tmp/news.csv"));
    }
}
