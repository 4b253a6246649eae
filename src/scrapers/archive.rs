//! Times of India daily archive page fetcher.
//!
//! The archive index marks its headline list with a single `<div>` carrying a
//! fixed inline style. Exactly one such container must be present; anything
//! else means the site layout changed and the crawl aborts with
//! [`CrawlError::StructuralMismatch`].

use crate::error::{CrawlError, Result};
use crate::models::RawAnchor;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Inline style the site has historically used on the headline container.
pub const CONTAINER_STYLE: &str = "font-family:arial ;font-size:12;font-weight:bold; color: #006699";

static CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!(r#"div[style="{CONTAINER_STYLE}"]"#)).expect("valid container selector")
});

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("valid anchor selector"));

/// Transport seam: fetch a page body by URL.
pub trait PageSource {
    async fn get(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET with no custom headers, auth, or cookies.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    /// A client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        debug!(status = %response.status(), "Archive response received");
        Ok(response.text().await?)
    }
}

/// Locate the unique headline container in `html` and list its anchors.
///
/// Anchors are returned in document order, including those nested deeper
/// inside the container. A missing `href` becomes an empty string.
///
/// # Errors
///
/// [`CrawlError::StructuralMismatch`] when the page holds zero or several
/// containers matching [`CONTAINER_STYLE`].
pub fn parse_archive_page(html: &str) -> Result<Vec<RawAnchor>> {
    let document = Html::parse_document(html);
    let containers: Vec<_> = document.select(&CONTAINER_SELECTOR).collect();
    let [container] = containers.as_slice() else {
        return Err(CrawlError::StructuralMismatch {
            found: containers.len(),
        });
    };

    let anchors = container
        .select(&ANCHOR_SELECTOR)
        .map(|a| RawAnchor::new(a.text().collect::<String>(), a.value().attr("href").unwrap_or_default()))
        .collect();
    Ok(anchors)
}

/// GET `url`, parse it, and return the anchors of its headline container.
///
/// # Arguments
///
/// * `source` - Transport used for the request
/// * `url` - Fully formed archive index URL
///
/// # Returns
///
/// The container's anchors, or an error if the request fails or the page
/// layout check fails. Neither is retried here.
#[instrument(level = "info", skip(source))]
pub async fn fetch_anchors<S: PageSource>(source: &S, url: &str) -> Result<Vec<RawAnchor>> {
    info!("Request sent to archive url");
    let body = source.get(url).await?;
    info!(bytes = body.len(), "Url retrieved, now parsing");

    let anchors = parse_archive_page(&body).inspect_err(|e| {
        error!(error = %e, "Archive layout check failed");
    })?;
    info!(count = anchors.len(), "Found hyperlinks in the archive");
    Ok(anchors)
}
