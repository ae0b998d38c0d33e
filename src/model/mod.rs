//! Core data types shared across the crawl pipeline.

use serde::Serialize;

/// What kind of page a crawl target points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A date's root results page: lists the day's races and is itself a
    /// race result
    Meeting,
    /// A single race's results page, discovered from the meeting card
    Race,
}

/// One unit of traversal work: an address plus what we expect to find there
///
/// Targets are created per traversal step and discarded afterwards; they
/// are never persisted.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub url: String,
    pub kind: TargetKind,
}

impl CrawlTarget {
    pub fn meeting(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: TargetKind::Meeting,
        }
    }

    pub fn race(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: TargetKind::Race,
        }
    }
}

/// Identity fields read from a race page header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceHeader {
    /// Meeting date as printed on the page, slashes replaced with dashes
    /// (e.g. "12-02-2022")
    pub date: String,
    /// Race number within the meeting
    pub race_number: u32,
}

impl RaceHeader {
    /// Record id for this page. The same page always yields the same id,
    /// so a re-processed address is detectable at the storage layer even
    /// when the in-memory frontier is cold.
    pub fn record_id(&self) -> String {
        format!("{}-{}", self.date, self.race_number)
    }
}

/// Scalar race fields extracted from the results header table
#[derive(Debug, Clone, Default, Serialize)]
pub struct RaceFields {
    pub race_class: String,
    pub distance: String,
    pub going: String,
    pub course: String,
    pub prize: String,
    pub pace: String,
}

/// Runner table as the page exposes it: one column per field,
/// index-aligned across all runners.
#[derive(Debug, Clone, Default)]
pub struct RunnerTable {
    pub place: Vec<String>,
    pub number: Vec<String>,
    pub name: Vec<String>,
    pub jockey: Vec<String>,
    pub trainer: Vec<String>,
    pub actual_weight: Vec<String>,
    pub declared_weight: Vec<String>,
    pub draw: Vec<String>,
    pub length_behind_winner: Vec<String>,
    pub running_positions: Vec<String>,
    pub finish_time: Vec<String>,
    pub win_odds: Vec<String>,
    pub horse_urls: Vec<String>,
}

impl RunnerTable {
    /// Number of runners, or None when the columns disagree on it
    /// (a ragged extraction that cannot be attributed row by row).
    pub fn row_count(&self) -> Option<usize> {
        let rows = self.place.len();
        let aligned = [
            self.number.len(),
            self.name.len(),
            self.jockey.len(),
            self.trainer.len(),
            self.actual_weight.len(),
            self.declared_weight.len(),
            self.draw.len(),
            self.length_behind_winner.len(),
            self.running_positions.len(),
            self.finish_time.len(),
            self.win_odds.len(),
            self.horse_urls.len(),
        ]
        .iter()
        .all(|&len| len == rows);

        aligned.then_some(rows)
    }
}

/// One race result: the record persisted per confirmed unit of work
#[derive(Debug, Clone, Serialize)]
pub struct RaceRecord {
    /// Deterministic id: "{date}-{race_number}"
    pub id: String,
    pub date: String,
    pub race_number: u32,
    #[serde(flatten)]
    pub fields: RaceFields,
    pub image_url: String,
    pub source_url: String,
    pub runners: Vec<RunnerEntry>,
}

/// One runner's row in a race, with a back-reference to its parent record
#[derive(Debug, Clone, Serialize)]
pub struct RunnerEntry {
    pub race_id: String,
    pub horse_id: String,
    /// Position of the row in the results table, starting at 1
    pub ordinal: u32,
    pub place: String,
    pub number: String,
    pub name: String,
    pub jockey: String,
    pub trainer: String,
    pub actual_weight: String,
    pub declared_weight: String,
    pub draw: String,
    pub length_behind_winner: String,
    pub running_positions: String,
    pub finish_time: String,
    pub win_odds: String,
    pub horse_url: String,
}

/// Derives a horse id from its profile link.
///
/// Profile links end in an id segment, either as a query value
/// (`…?HorseId=HK_2019_E100`) or as the last path segment.
pub fn horse_id_from_url(url: &str) -> String {
    url.rsplit(['=', '/'])
        .next()
        .filter(|id| !id.is_empty())
        .unwrap_or(url)
        .to_string()
}
