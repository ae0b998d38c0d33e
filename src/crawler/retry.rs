//! Bounded re-navigation for a single address.

use crate::crawler::detector::{detect, Verdict};
use crate::model::TargetKind;
use crate::page::ResultsPage;
use crate::CrawlError;
use std::time::Duration;

/// Outcome of trying to bring up an event page for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The page is up and carries the event; the session is parked on it
    Confirmed,
    /// The address has no event (meeting addresses are never retried)
    NoEvent,
    /// Every attempt failed to surface an event
    Exhausted,
}

/// Re-navigation policy: how many times to try one address and how long
/// to wait between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Navigates until the page confirms an event or attempts run out.
    ///
    /// Meeting pages get a single attempt: a day either raced or it
    /// didn't, and asking again does not change the answer. Race pages
    /// are re-navigated up to the attempt bound, because the site
    /// sometimes serves its placeholder while results are still being
    /// rendered.
    ///
    /// Navigation errors are terminal for meeting pages (the caller
    /// skips the date) and count as failed attempts for race pages.
    pub async fn confirm<P: ResultsPage>(
        &self,
        page: &mut P,
        url: &str,
        kind: TargetKind,
    ) -> Result<RetryOutcome, CrawlError> {
        let attempts = match kind {
            TargetKind::Meeting => 1,
            TargetKind::Race => self.max_attempts,
        };

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.delay).await;
            }

            match page.navigate(url).await {
                Ok(()) => match detect(page, url) {
                    Verdict::EventPresent => return Ok(RetryOutcome::Confirmed),
                    Verdict::NoEvent => {
                        tracing::debug!("No event loaded at {} (attempt {})", url, attempt);
                    }
                    Verdict::Redirected => {
                        tracing::debug!(
                            "Request for {} resolved to {} (attempt {})",
                            url,
                            page.current_url(),
                            attempt
                        );
                    }
                },
                Err(err) if kind == TargetKind::Meeting => {
                    return Err(CrawlError::Navigation(err));
                }
                Err(err) => {
                    tracing::warn!("Navigation to {} failed (attempt {}): {}", url, attempt, err);
                }
            }
        }

        Ok(match kind {
            TargetKind::Meeting => RetryOutcome::NoEvent,
            TargetKind::Race => RetryOutcome::Exhausted,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}
