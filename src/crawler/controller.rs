//! Crawl controller - the top-level traversal state machine.
//!
//! A run walks the requested dates most-recent-first. For each date:
//! frontier check, a single-attempt navigation with event detection,
//! race-card enumeration, the meeting's own record, then every race on
//! the card in page order with bounded retry. One navigation is in
//! flight at a time; the frontier is consulted before every navigation
//! decision and appended to only after a unit completes.

use crate::archive::ArtifactStore;
use crate::config::Config;
use crate::crawler::processor::process_page;
use crate::crawler::retry::{RetryOutcome, RetryPolicy};
use crate::dates::{date_range, meeting_targets};
use crate::frontier::Frontier;
use crate::model::{CrawlTarget, TargetKind};
use crate::page::ResultsPage;
use crate::storage::{Storage, StorageError};
use crate::CrawlError;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters reported at the end of a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Units processed and persisted this run (meetings and races)
    pub records_stored: u64,
    /// Addresses skipped because the frontier already contained them
    pub skipped: u64,
    /// Addresses recorded as having no event
    pub no_event: u64,
    /// Race addresses that exhausted their retry budget
    pub exhausted: u64,
    /// Units abandoned on navigation or extraction failures
    pub failed: u64,
}

/// The top-level crawl state machine
///
/// Owns the page session, the storage backend, and the frontier for the
/// duration of one run. Strictly sequential: the page session is a
/// single stateful browsing context and cannot serve two navigations at
/// once.
pub struct CrawlController<P, S, A> {
    page: P,
    storage: S,
    artifacts: A,
    frontier: Frontier,
    retry: RetryPolicy,
    base_url: String,
    shutdown: Arc<AtomicBool>,
}

impl<P, S, A> CrawlController<P, S, A>
where
    P: ResultsPage,
    S: Storage,
    A: ArtifactStore,
{
    /// Creates a controller, eagerly loading the frontier from storage.
    ///
    /// A storage failure here means the run cannot make its dedup
    /// guarantees and is fatal.
    pub fn new(page: P, storage: S, artifacts: A, config: &Config) -> Result<Self, CrawlError> {
        let frontier = Frontier::load(&storage)?;
        let retry = RetryPolicy::new(
            config.crawler.retry_attempts,
            Duration::from_millis(config.crawler.retry_delay_ms),
        );

        Ok(Self {
            page,
            storage,
            artifacts,
            frontier,
            retry,
            base_url: config.crawler.base_url.clone(),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag checked between targets. Setting it ends the run at the next
    /// target boundary without interrupting the unit in flight.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn artifacts(&self) -> &A {
        &self.artifacts
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Runs a full crawl over the last `days` days, ending yesterday.
    pub async fn run(&mut self, days: i64) -> Result<RunSummary, CrawlError> {
        let today = chrono::Local::now().date_naive();
        self.run_from(today, days).await
    }

    /// Like [`Self::run`], with an explicit current date. Tests pin this.
    pub async fn run_from(&mut self, today: NaiveDate, days: i64) -> Result<RunSummary, CrawlError> {
        let dates = date_range(today, days)?;
        let targets = meeting_targets(&self.base_url, &dates);
        tracing::info!("Crawling {} dates, most recent first", targets.len());

        let mut summary = RunSummary::default();
        for target in &targets {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("Shutdown requested, stopping before {}", target.url);
                break;
            }
            self.visit_date(target, &mut summary).await?;
        }

        tracing::info!(
            "Run complete: {} stored, {} skipped, {} no-event, {} exhausted, {} failed",
            summary.records_stored,
            summary.skipped,
            summary.no_event,
            summary.exhausted,
            summary.failed
        );
        Ok(summary)
    }

    /// One full date: the root page, card enumeration, and every race on
    /// the card.
    async fn visit_date(
        &mut self,
        root: &CrawlTarget,
        summary: &mut RunSummary,
    ) -> Result<(), CrawlError> {
        if self.frontier.is_visited(&root.url) {
            tracing::info!("Already collected {}", root.url);
            summary.skipped += 1;
            return Ok(());
        }

        // A day either raced or it didn't: one attempt, no retry.
        match self
            .retry
            .confirm(&mut self.page, &root.url, TargetKind::Meeting)
            .await
        {
            Ok(RetryOutcome::Confirmed) => {}
            Ok(_) => {
                tracing::info!("No event on {}", root.url);
                self.record_no_event(&root.url, summary)?;
                return Ok(());
            }
            Err(CrawlError::Navigation(err)) => {
                tracing::warn!("Could not reach {}, skipping the date: {}", root.url, err);
                summary.failed += 1;
                return Ok(());
            }
            Err(err) => return Err(err),
        }

        // Enumerate the card while the session is still on the root page
        let race_links = match self.page.extract_race_links() {
            Ok(links) => links,
            Err(err) => {
                tracing::warn!("Could not enumerate races on {}: {}", root.url, err);
                summary.failed += 1;
                return Ok(());
            }
        };

        // The root page is itself a race result, not merely an index
        if !self.frontier.is_visited(&root.url) {
            self.process_unit(root, summary).await?;
        }

        for link in race_links {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("Shutdown requested, stopping before {}", link);
                break;
            }

            let target = CrawlTarget::race(link);
            if self.frontier.is_visited(&target.url) {
                tracing::info!("Already collected {}", target.url);
                summary.skipped += 1;
                continue;
            }

            match self
                .retry
                .confirm(&mut self.page, &target.url, TargetKind::Race)
                .await?
            {
                RetryOutcome::Confirmed => {
                    self.process_unit(&target, summary).await?;
                }
                // Never abort the date because one race would not load
                RetryOutcome::Exhausted | RetryOutcome::NoEvent => {
                    tracing::warn!("Gave up on {} after repeated empty loads", target.url);
                    summary.exhausted += 1;
                    self.record_no_event(&target.url, summary)?;
                }
            }
        }

        Ok(())
    }

    /// Runs the processor for a confirmed page and marks the frontier on
    /// success. Extraction failures skip the unit; the run continues.
    async fn process_unit(
        &mut self,
        target: &CrawlTarget,
        summary: &mut RunSummary,
    ) -> Result<(), CrawlError> {
        match process_page(&self.page, &mut self.storage, &self.artifacts, target).await {
            Ok(record) => {
                tracing::info!("Collected {} from {}", record.id, target.url);
                self.frontier.mark_visited(&target.url);
                summary.records_stored += 1;
                Ok(())
            }
            Err(CrawlError::Extraction(err)) => {
                tracing::warn!("Skipping {}: {}", target.url, err);
                summary.failed += 1;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn record_no_event(&mut self, url: &str, summary: &mut RunSummary) -> Result<(), CrawlError> {
        match self.storage.save_no_event(url) {
            Ok(()) => {}
            Err(StorageError::DuplicateKey(_)) => {
                tracing::debug!("{} already recorded as no-event", url);
            }
            Err(err) => return Err(err.into()),
        }
        self.frontier.mark_visited(url);
        summary.no_event += 1;
        Ok(())
    }
}
