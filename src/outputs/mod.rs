//! Result sinks for harvested rows.
//!
//! # Output Structure
//!
//! ```text
//! news.csv
//! ,date,headline,link
//! 0,2019-02-07,Some headline,http://timesofindia.indiatimes.com/...cms
//! 1,2019-02-07,Headline whose link was rejected,
//! ```

pub mod csv;
