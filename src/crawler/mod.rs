//! Crawl traversal: event detection, bounded retry, unit processing, and
//! the controller that sequences them.

mod controller;
mod detector;
mod processor;
mod retry;

pub use controller::{CrawlController, RunSummary};
pub use detector::{detect, Verdict};
pub use processor::process_page;
pub use retry::{RetryOutcome, RetryPolicy};

use crate::archive::{LocalArtifacts, S3Artifacts};
use crate::config::Config;
use crate::page::HttpSession;
use crate::storage::SqliteStorage;
use crate::CrawlError;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Runs a complete crawl with the shipped collaborators: an HTTP page
/// session, SQLite storage, and local artifacts (mirrored to S3 when an
/// archive bucket is configured).
///
/// Ctrl-C requests a cooperative stop at the next target boundary; the
/// unit in flight is finished first, since a partially extracted record
/// is unusable.
pub async fn run_crawl(config: Config, days: i64) -> Result<RunSummary, CrawlError> {
    let storage = SqliteStorage::new(Path::new(&config.database.path))?;
    let session = HttpSession::with_settle_delay(Duration::from_millis(
        config.crawler.settle_delay_ms,
    ))?;
    let local = LocalArtifacts::new(&config.artifacts.root);

    match &config.archive {
        Some(archive) => {
            let artifacts =
                S3Artifacts::from_env(local, archive.bucket.clone(), archive.prefix.clone()).await;
            let controller = CrawlController::new(session, storage, artifacts, &config)?;
            drive(controller, days).await
        }
        None => {
            let controller = CrawlController::new(session, storage, local, &config)?;
            drive(controller, days).await
        }
    }
}

async fn drive<P, S, A>(
    mut controller: CrawlController<P, S, A>,
    days: i64,
) -> Result<RunSummary, CrawlError>
where
    P: crate::page::ResultsPage,
    S: crate::storage::Storage,
    A: crate::archive::ArtifactStore,
{
    let shutdown = controller.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing the current page before exit");
            shutdown.store(true, Ordering::Relaxed);
        }
    });

    controller.run(days).await
}
