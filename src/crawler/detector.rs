//! Event detection for a navigated page.

use crate::page::ResultsPage;

/// What the detector concluded about a navigated page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The page carries race results for the requested address
    EventPresent,
    /// The page rendered the site's explicit empty/error placeholder
    NoEvent,
    /// The request resolved to a different address: the site silently
    /// rejected or rescheduled it
    Redirected,
}

/// Judges whether a navigated page actually contains an event.
///
/// The redirect check runs first: a redirected page may well render
/// someone else's results, and those must not be attributed to the
/// requested address.
pub fn detect<P: ResultsPage + ?Sized>(page: &P, requested: &str) -> Verdict {
    if page.current_url() != requested {
        Verdict::Redirected
    } else if page.has_event_marker() {
        Verdict::EventPresent
    } else {
        Verdict::NoEvent
    }
}
