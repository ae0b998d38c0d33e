//! Shared test doubles for the controller tests.

use async_trait::async_trait;
use paddock::archive::{ArchiveResult, ArtifactStore};
use paddock::model::{RaceFields, RaceHeader, RaceRecord, RunnerTable};
use paddock::page::{ExtractionError, NavigationError, ResultsPage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// What a scripted page should show for one address
pub struct PageFixture {
    /// Address the navigation resolves to; None means no redirect
    pub resolved_url: Option<String>,
    pub has_event: bool,
    pub header: RaceHeader,
    pub fields: RaceFields,
    pub race_links: Vec<String>,
    pub runners: RunnerTable,
    pub image_url: String,
}

impl PageFixture {
    /// A page carrying an event with the given identity
    pub fn event(date: &str, race_number: u32) -> Self {
        Self {
            resolved_url: None,
            has_event: true,
            header: RaceHeader {
                date: date.to_string(),
                race_number,
            },
            fields: RaceFields {
                race_class: "Class 4".to_string(),
                distance: "1200M".to_string(),
                going: "GOOD".to_string(),
                course: "TURF - \"A\" COURSE".to_string(),
                prize: "HK$ 1,000,000".to_string(),
                pace: "24.50/23.10/22.95".to_string(),
            },
            race_links: Vec::new(),
            runners: single_runner_table(),
            image_url: "https://img.example.com/racing_L.jpg".to_string(),
        }
    }

    /// The site's explicit empty/error placeholder
    pub fn no_event() -> Self {
        let mut fixture = Self::event("00-00-0000", 0);
        fixture.has_event = false;
        fixture
    }

    /// A request the site silently redirects elsewhere
    pub fn redirected(to: &str) -> Self {
        let mut fixture = Self::event("00-00-0000", 0);
        fixture.resolved_url = Some(to.to_string());
        fixture
    }

    pub fn with_race_links(mut self, links: &[&str]) -> Self {
        self.race_links = links.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_runners(mut self, runners: RunnerTable) -> Self {
        self.runners = runners;
        self
    }
}

/// A one-row runner table with aligned columns
pub fn single_runner_table() -> RunnerTable {
    let mut table = RunnerTable::default();
    table.place.push("1".to_string());
    table.number.push("7".to_string());
    table.name.push("LUCKY EXPRESS".to_string());
    table.jockey.push("J Moreira".to_string());
    table.trainer.push("C Fownes".to_string());
    table.actual_weight.push("120".to_string());
    table.declared_weight.push("1050".to_string());
    table.draw.push("3".to_string());
    table.length_behind_winner.push("-".to_string());
    table.running_positions.push("2 2 1".to_string());
    table.finish_time.push("1:09.95".to_string());
    table.win_odds.push("4.5".to_string());
    table
        .horse_urls
        .push("/Horse.aspx?HorseId=HK_2019_E100".to_string());
    table
}

/// A runner table whose columns disagree on the row count
pub fn ragged_runner_table() -> RunnerTable {
    let mut table = single_runner_table();
    table.win_odds.push("9.9".to_string());
    table
}

/// Scripted page session: serves fixtures by requested address and
/// records every navigation.
pub struct MockPage {
    fixtures: HashMap<String, PageFixture>,
    /// Address of the last navigation request
    requested: String,
    /// Address the last navigation resolved to
    resolved: String,
    pub nav_log: Vec<String>,
    pub race_link_calls: AtomicU32,
}

impl MockPage {
    pub fn new(fixtures: Vec<(&str, PageFixture)>) -> Self {
        Self {
            fixtures: fixtures
                .into_iter()
                .map(|(url, fixture)| (url.to_string(), fixture))
                .collect(),
            requested: String::new(),
            resolved: String::new(),
            nav_log: Vec::new(),
            race_link_calls: AtomicU32::new(0),
        }
    }

    pub fn navigations_to(&self, url: &str) -> usize {
        self.nav_log.iter().filter(|seen| *seen == url).count()
    }

    fn fixture(&self) -> Option<&PageFixture> {
        self.fixtures.get(&self.requested)
    }
}

#[async_trait]
impl ResultsPage for MockPage {
    async fn navigate(&mut self, url: &str) -> Result<(), NavigationError> {
        self.nav_log.push(url.to_string());
        let fixture = self
            .fixtures
            .get(url)
            .ok_or_else(|| NavigationError::Status {
                url: url.to_string(),
                status: 404,
            })?;
        self.requested = url.to_string();
        self.resolved = fixture
            .resolved_url
            .clone()
            .unwrap_or_else(|| url.to_string());
        Ok(())
    }

    fn current_url(&self) -> &str {
        &self.resolved
    }

    fn has_event_marker(&self) -> bool {
        self.fixture().map(|f| f.has_event).unwrap_or(false)
    }

    fn extract_race_header(&self) -> Result<RaceHeader, ExtractionError> {
        self.fixture()
            .map(|f| f.header.clone())
            .ok_or_else(|| missing(&self.requested, "race header"))
    }

    fn extract_race_fields(&self) -> Result<RaceFields, ExtractionError> {
        self.fixture()
            .map(|f| f.fields.clone())
            .ok_or_else(|| missing(&self.requested, "race fields"))
    }

    fn extract_race_links(&self) -> Result<Vec<String>, ExtractionError> {
        self.race_link_calls.fetch_add(1, Ordering::Relaxed);
        self.fixture()
            .map(|f| f.race_links.clone())
            .ok_or_else(|| missing(&self.requested, "race links"))
    }

    fn extract_runner_table(&self) -> Result<RunnerTable, ExtractionError> {
        self.fixture()
            .map(|f| f.runners.clone())
            .ok_or_else(|| missing(&self.requested, "runner table"))
    }

    fn extract_image_url(&self) -> Result<String, ExtractionError> {
        self.fixture()
            .map(|f| f.image_url.clone())
            .ok_or_else(|| missing(&self.requested, "result image"))
    }

    async fn fetch_image(&self, _url: &str) -> Result<Vec<u8>, NavigationError> {
        Ok(vec![0xFF, 0xD8, 0xFF])
    }
}

fn missing(url: &str, what: &'static str) -> ExtractionError {
    ExtractionError {
        url: url.to_string(),
        what,
    }
}

/// In-memory artifact store recording what was saved and archived
#[derive(Default)]
pub struct MemoryArtifacts {
    pub records: Mutex<Vec<String>>,
    pub images: Mutex<Vec<String>>,
    pub archived: Mutex<Vec<String>>,
}

#[async_trait]
impl ArtifactStore for MemoryArtifacts {
    fn save_record(&self, record: &RaceRecord) -> ArchiveResult<()> {
        self.records.lock().unwrap().push(record.id.clone());
        Ok(())
    }

    fn save_image(&self, race_id: &str, _bytes: &[u8]) -> ArchiveResult<()> {
        self.images.lock().unwrap().push(race_id.to_string());
        Ok(())
    }

    async fn archive_race(&self, race_id: &str) -> ArchiveResult<()> {
        self.archived.lock().unwrap().push(race_id.to_string());
        Ok(())
    }
}
