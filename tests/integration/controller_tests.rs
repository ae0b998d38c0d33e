//! Controller traversal properties, driven by a scripted page session
//! and an in-memory database.

use crate::support::{
    ragged_runner_table, MemoryArtifacts, MockPage, PageFixture,
};
use chrono::NaiveDate;
use paddock::config::{ArtifactsConfig, Config, CrawlerConfig, DatabaseConfig};
use paddock::model::{RaceFields, RaceRecord};
use paddock::storage::{SqliteStorage, Storage};
use paddock::CrawlController;
use std::sync::atomic::Ordering;

const BASE_URL: &str = "https://example.com/results?RaceDate=";
const ROOT: &str = "https://example.com/results?RaceDate=2022/02/12";
const RACE_A: &str = "https://example.com/race?RaceDate=2022/02/12&RaceNo=1";
const RACE_B: &str = "https://example.com/race?RaceDate=2022/02/12&RaceNo=2";

fn test_config() -> Config {
    Config {
        crawler: CrawlerConfig {
            days: 1,
            base_url: BASE_URL.to_string(),
            settle_delay_ms: 0,
            retry_attempts: 3,
            retry_delay_ms: 0,
        },
        database: DatabaseConfig::default(),
        artifacts: ArtifactsConfig::default(),
        archive: None,
    }
}

fn today() -> NaiveDate {
    // Yesterday relative to this date is 2022-02-12, the fixture date
    NaiveDate::from_ymd_opt(2022, 2, 13).unwrap()
}

fn stored_record(id: &str, source_url: &str) -> RaceRecord {
    RaceRecord {
        id: id.to_string(),
        date: "12-02-2022".to_string(),
        race_number: 9,
        fields: RaceFields::default(),
        image_url: "https://img.example.com/racing_L.jpg".to_string(),
        source_url: source_url.to_string(),
        runners: vec![],
    }
}

fn controller(
    page: MockPage,
    storage: SqliteStorage,
) -> CrawlController<MockPage, SqliteStorage, MemoryArtifacts> {
    CrawlController::new(page, storage, MemoryArtifacts::default(), &test_config()).unwrap()
}

#[tokio::test]
async fn no_event_root_gets_one_attempt_and_no_enumeration() {
    let page = MockPage::new(vec![(ROOT, PageFixture::no_event())]);
    let mut controller = controller(page, SqliteStorage::new_in_memory().unwrap());

    let summary = controller.run_from(today(), 1).await.unwrap();

    assert_eq!(summary.no_event, 1);
    assert_eq!(summary.records_stored, 0);
    assert_eq!(controller.page().navigations_to(ROOT), 1);
    assert_eq!(controller.page().race_link_calls.load(Ordering::Relaxed), 0);
    assert_eq!(controller.storage().count_no_event().unwrap(), 1);
    assert!(controller.frontier().is_visited(ROOT));
}

#[tokio::test]
async fn redirected_root_is_recorded_as_no_event() {
    let page = MockPage::new(vec![(
        ROOT,
        PageFixture::redirected("https://example.com/results?RaceDate=2022/02/09"),
    )]);
    let mut controller = controller(page, SqliteStorage::new_in_memory().unwrap());

    let summary = controller.run_from(today(), 1).await.unwrap();

    assert_eq!(summary.no_event, 1);
    assert_eq!(controller.page().navigations_to(ROOT), 1);
    assert!(controller.frontier().is_visited(ROOT));
}

#[tokio::test]
async fn race_page_exhausts_after_exactly_three_attempts() {
    let page = MockPage::new(vec![
        (ROOT, PageFixture::event("12-02-2022", 1).with_race_links(&[RACE_A])),
        (RACE_A, PageFixture::no_event()),
    ]);
    let mut controller = controller(page, SqliteStorage::new_in_memory().unwrap());

    let summary = controller.run_from(today(), 1).await.unwrap();

    // The root itself was collected; the race burned its full budget
    assert_eq!(summary.records_stored, 1);
    assert_eq!(summary.exhausted, 1);
    assert_eq!(controller.page().navigations_to(RACE_A), 3);
    assert!(controller.frontier().is_visited(RACE_A));
    assert_eq!(controller.storage().count_no_event().unwrap(), 1);
}

#[tokio::test]
async fn frontier_hits_skip_processing_but_new_races_are_collected() {
    let page = MockPage::new(vec![
        (
            ROOT,
            PageFixture::event("12-02-2022", 1).with_race_links(&[RACE_A, RACE_B]),
        ),
        (RACE_A, PageFixture::event("12-02-2022", 5)),
        (RACE_B, PageFixture::event("12-02-2022", 2)),
    ]);

    // A previous run already collected race A
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    storage.save_race(&stored_record("12-02-2022-9", RACE_A)).unwrap();

    let mut controller = controller(page, storage);
    let summary = controller.run_from(today(), 1).await.unwrap();

    assert_eq!(summary.records_stored, 2); // the root and race B
    assert_eq!(summary.skipped, 1); // race A
    assert_eq!(controller.page().navigations_to(RACE_A), 0);
    assert_eq!(controller.page().navigations_to(RACE_B), 1);
    assert!(controller.frontier().is_visited(ROOT));
    assert!(controller.frontier().is_visited(RACE_A));
    assert!(controller.frontier().is_visited(RACE_B));
    assert_eq!(controller.storage().count_races().unwrap(), 3);

    // Every processed unit got its sidecar, image, and archive pass
    let records = controller.artifacts().records.lock().unwrap();
    assert_eq!(*records, vec!["12-02-2022-1", "12-02-2022-2"]);
    let archived = controller.artifacts().archived.lock().unwrap();
    assert_eq!(*archived, vec!["12-02-2022-1", "12-02-2022-2"]);
    let images = controller.artifacts().images.lock().unwrap();
    assert_eq!(images.len(), 2);
}

#[tokio::test]
async fn second_run_over_unchanged_frontier_processes_nothing() {
    let page = MockPage::new(vec![
        (ROOT, PageFixture::event("12-02-2022", 1).with_race_links(&[RACE_B])),
        (RACE_B, PageFixture::event("12-02-2022", 2)),
    ]);
    let mut controller = controller(page, SqliteStorage::new_in_memory().unwrap());

    let first = controller.run_from(today(), 1).await.unwrap();
    assert_eq!(first.records_stored, 2);

    let navigations_after_first = controller.page().nav_log.len();
    let second = controller.run_from(today(), 1).await.unwrap();

    assert_eq!(second.records_stored, 0);
    assert_eq!(second.skipped, 1); // the whole date, at the root
    assert_eq!(controller.page().nav_log.len(), navigations_after_first);
}

#[tokio::test]
async fn duplicate_key_is_tolerated_and_the_run_continues() {
    let page = MockPage::new(vec![(ROOT, PageFixture::event("12-02-2022", 2))]);

    // Same record id already in storage, under a different address, so
    // the frontier misses it but the insert collides.
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    storage
        .save_race(&stored_record("12-02-2022-2", "https://example.com/elsewhere"))
        .unwrap();

    let mut controller = controller(page, storage);
    let summary = controller.run_from(today(), 1).await.unwrap();

    assert_eq!(summary.records_stored, 1);
    assert_eq!(controller.storage().count_races().unwrap(), 1);
    assert!(controller.frontier().is_visited(ROOT));
}

#[tokio::test]
async fn extraction_failure_skips_the_unit_but_not_the_date() {
    let page = MockPage::new(vec![
        (ROOT, PageFixture::event("12-02-2022", 1).with_race_links(&[RACE_B])),
        (
            RACE_B,
            PageFixture::event("12-02-2022", 2).with_runners(ragged_runner_table()),
        ),
    ]);
    let mut controller = controller(page, SqliteStorage::new_in_memory().unwrap());

    let summary = controller.run_from(today(), 1).await.unwrap();

    assert_eq!(summary.records_stored, 1); // the root survived
    assert_eq!(summary.failed, 1); // race B was skipped
    assert!(!controller.frontier().is_visited(RACE_B));
}

#[tokio::test]
async fn shutdown_before_the_first_target_visits_nothing() {
    let page = MockPage::new(vec![(ROOT, PageFixture::event("12-02-2022", 1))]);
    let mut controller = controller(page, SqliteStorage::new_in_memory().unwrap());

    controller.shutdown_handle().store(true, Ordering::Relaxed);
    let summary = controller.run_from(today(), 1).await.unwrap();

    assert_eq!(summary, Default::default());
    assert!(controller.page().nav_log.is_empty());
}

#[tokio::test]
async fn invalid_day_count_aborts_the_run() {
    let page = MockPage::new(vec![]);
    let mut controller = controller(page, SqliteStorage::new_in_memory().unwrap());

    assert!(matches!(
        controller.run_from(today(), 0).await,
        Err(paddock::CrawlError::InvalidDayCount(0))
    ));
    assert!(matches!(
        controller.run_from(today(), -2).await,
        Err(paddock::CrawlError::InvalidDayCount(-2))
    ));
}

#[tokio::test]
async fn multiple_dates_are_visited_most_recent_first() {
    let root_12 = ROOT;
    let root_11 = "https://example.com/results?RaceDate=2022/02/11";

    let page = MockPage::new(vec![
        (root_12, PageFixture::no_event()),
        (root_11, PageFixture::no_event()),
    ]);
    let mut controller = controller(page, SqliteStorage::new_in_memory().unwrap());

    let summary = controller.run_from(today(), 2).await.unwrap();

    assert_eq!(summary.no_event, 2);
    assert_eq!(controller.page().nav_log, vec![root_12, root_11]);
}
