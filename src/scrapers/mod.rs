//! Archive page scraping.
//!
//! The harvester talks to one publisher. Fetching is split in two so the
//! parsing half can be exercised without a network:
//!
//! 1. **Transport**: a [`archive::PageSource`] returns the raw page body
//! 2. **Structure**: [`archive::parse_archive_page`] locates the headline
//!    container and lists its anchors

pub mod archive;
