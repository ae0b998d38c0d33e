//! HTTP-backed page session.
//!
//! Navigation is a plain GET followed by a fixed settle delay: the site
//! exposes no load-complete signal, so the session waits out the render
//! latency before extraction is considered valid. One navigation is in
//! flight at a time; the session keeps the resolved address and body of
//! the page it is parked on.

use crate::model::{RaceFields, RaceHeader, RunnerTable};
use crate::page::{extract, ExtractionError, NavigationError, ResultsPage};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used by [`HttpSession`]
pub fn build_http_client() -> Result<Client, NavigationError> {
    Client::builder()
        .user_agent(concat!("paddock/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(NavigationError::Client)
}

/// A single stateful HTTP session over the results site
pub struct HttpSession {
    client: Client,
    settle_delay: Duration,
    current_url: String,
    body: String,
}

impl HttpSession {
    pub fn new(client: Client, settle_delay: Duration) -> Self {
        Self {
            client,
            settle_delay,
            current_url: String::new(),
            body: String::new(),
        }
    }

    /// Convenience constructor with the default client configuration
    pub fn with_settle_delay(settle_delay: Duration) -> Result<Self, NavigationError> {
        Ok(Self::new(build_http_client()?, settle_delay))
    }

    fn base_url(&self) -> Result<Url, ExtractionError> {
        Url::parse(&self.current_url).map_err(|_| ExtractionError {
            url: self.current_url.clone(),
            what: "page address",
        })
    }
}

#[async_trait]
impl ResultsPage for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<(), NavigationError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| NavigationError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavigationError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Redirects are followed by the client; the resolved address is
        // what the event detector compares against the requested one.
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|source| NavigationError::Request {
                url: url.to_string(),
                source,
            })?;

        self.current_url = final_url;
        self.body = body;

        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    fn current_url(&self) -> &str {
        &self.current_url
    }

    fn has_event_marker(&self) -> bool {
        !self.body.is_empty() && !extract::has_error_container(&self.body)
    }

    fn extract_race_header(&self) -> Result<RaceHeader, ExtractionError> {
        extract::race_header(&self.body, &self.current_url)
    }

    fn extract_race_fields(&self) -> Result<RaceFields, ExtractionError> {
        extract::race_fields(&self.body, &self.current_url)
    }

    fn extract_race_links(&self) -> Result<Vec<String>, ExtractionError> {
        extract::race_links(&self.body, &self.base_url()?)
    }

    fn extract_runner_table(&self) -> Result<RunnerTable, ExtractionError> {
        extract::runner_table(&self.body, &self.current_url)
    }

    fn extract_image_url(&self) -> Result<String, ExtractionError> {
        extract::image_url(&self.body, &self.base_url()?)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, NavigationError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| NavigationError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavigationError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| NavigationError::Request {
                url: url.to_string(),
                source,
            })?;

        Ok(bytes.to_vec())
    }
}
