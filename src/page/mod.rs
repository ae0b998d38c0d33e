//! The page capability: navigation and field extraction.
//!
//! The crawl controller never touches HTML. Everything it needs from a
//! rendered page goes through the [`ResultsPage`] trait, so the HTTP
//! session can be replaced by a scripted page in tests, or by a headless
//! browser backend, without touching traversal logic.

mod extract;
mod session;

pub use session::{build_http_client, HttpSession};

use crate::model::{RaceFields, RaceHeader, RunnerTable};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while navigating to or downloading from the results site
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// The page loaded and claims to carry an event, but an expected field
/// was absent (schema drift on the remote site). Surfaced per unit; the
/// run continues.
#[derive(Debug, Error)]
#[error("Missing {what} on {url}")]
pub struct ExtractionError {
    pub url: String,
    pub what: &'static str,
}

/// A stateful browsing session over the results site.
///
/// One page is "open" at a time; `navigate` replaces it. All extractors
/// read the currently open page.
#[async_trait]
pub trait ResultsPage {
    /// Navigates to `url` and waits out the render settle delay.
    async fn navigate(&mut self, url: &str) -> Result<(), NavigationError>;

    /// The address the last navigation actually resolved to.
    fn current_url(&self) -> &str;

    /// Whether the current page carries race results, as opposed to the
    /// site's explicit empty/error placeholder.
    fn has_event_marker(&self) -> bool;

    /// Meeting date and race number from the page header.
    fn extract_race_header(&self) -> Result<RaceHeader, ExtractionError>;

    /// Scalar race fields from the results header table.
    fn extract_race_fields(&self) -> Result<RaceFields, ExtractionError>;

    /// Addresses of the other races run on the same day, in card order.
    fn extract_race_links(&self) -> Result<Vec<String>, ExtractionError>;

    /// The runner table in columnar form.
    fn extract_runner_table(&self) -> Result<RunnerTable, ExtractionError>;

    /// Address of the full-size result image.
    fn extract_image_url(&self) -> Result<String, ExtractionError>;

    /// Downloads the result image bytes.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, NavigationError>;
}
