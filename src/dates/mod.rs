//! Date-range generation for root result pages.
//!
//! A crawl is addressed by meeting date: one root page per calendar day,
//! reached through a fixed URL template with a zero-padded date suffix.

use crate::model::CrawlTarget;
use crate::CrawlError;
use chrono::{Duration, NaiveDate};

/// Expands a day count into the dates to visit, most recent first.
///
/// The range starts at the day before `today` (results for the current
/// date are not published until the meeting has finished) and walks
/// strictly backwards one day at a time. A non-positive `days` is
/// rejected rather than silently falling back to a default.
pub fn date_range(today: NaiveDate, days: i64) -> Result<Vec<NaiveDate>, CrawlError> {
    if days <= 0 {
        return Err(CrawlError::InvalidDayCount(days));
    }

    let start = today - Duration::days(1);
    Ok((0..days).map(|offset| start - Duration::days(offset)).collect())
}

/// Formats one root-page target per date.
///
/// The address template is fixed: the base URL with the date appended as
/// zero-padded `YYYY/MM/DD` segments.
pub fn meeting_targets(base_url: &str, dates: &[NaiveDate]) -> Vec<CrawlTarget> {
    dates
        .iter()
        .map(|date| CrawlTarget::meeting(format!("{}{}", base_url, date.format("%Y/%m/%d"))))
        .collect()
}
