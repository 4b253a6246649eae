//! Error taxonomy for the harvester.
//!
//! Only conditions that must stop a crawl step are errors. An unpublished or
//! out-of-range date is an absent URL, and an empty archive page is a
//! scheduling signal ([`crate::scheduler::StepOutcome::Retry`]).

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, CrawlError>;

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// The archive page did not contain exactly one headline container.
    /// The site layout changed; this is never retried.
    #[error("Found {found} divs matching signature. Aborting.")]
    StructuralMismatch { found: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid date argument: {0}")]
    InvalidDateArg(String),
}

impl CrawlError {
    /// Whether the error signals a site layout change rather than a transport failure.
    pub fn is_structural(&self) -> bool {
        matches!(self, CrawlError::StructuralMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_mismatch_message() {
        let err = CrawlError::StructuralMismatch { found: 2 };
        assert_eq!(err.to_string(), "Found 2 divs matching signature. Aborting.");
        assert!(err.is_structural());
    }

    #[test]
    fn test_invalid_date_arg_is_not_structural() {
        let err = CrawlError::InvalidDateArg("2019-02-30".to_string());
        assert!(!err.is_structural());
        assert!(err.to_string().contains("2019-02-30"));
    }
}
