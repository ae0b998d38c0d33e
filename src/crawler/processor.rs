//! Single-unit processing: extraction and persistence for one confirmed
//! page.

use crate::archive::ArtifactStore;
use crate::model::{
    horse_id_from_url, CrawlTarget, RaceRecord, RunnerEntry, RunnerTable,
};
use crate::page::{ExtractionError, ResultsPage};
use crate::storage::{Storage, StorageError};
use crate::CrawlError;

/// How many times to try downloading the result image before giving up
const IMAGE_FETCH_TRIES: u32 = 3;

/// Extracts, persists, and archives one confirmed unit of work.
///
/// The session must already be parked on the confirmed page. A duplicate
/// id at the storage layer is logged and treated as success: the frontier
/// was stale and the record is already there. Image and archive failures
/// are logged and do not fail the unit.
pub async fn process_page<P, S, A>(
    page: &P,
    storage: &mut S,
    artifacts: &A,
    target: &CrawlTarget,
) -> Result<RaceRecord, CrawlError>
where
    P: ResultsPage,
    S: Storage,
    A: ArtifactStore,
{
    let header = page.extract_race_header()?;
    let fields = page.extract_race_fields()?;
    let image_url = page.extract_image_url()?;
    let columns = page.extract_runner_table()?;

    let id = header.record_id();
    let runners = attribute_runners(&id, &columns, page.current_url())?;

    let record = RaceRecord {
        id,
        date: header.date,
        race_number: header.race_number,
        fields,
        image_url,
        source_url: target.url.clone(),
        runners,
    };

    match storage.save_race(&record) {
        Ok(()) => {}
        Err(StorageError::DuplicateKey(id)) => {
            tracing::warn!("Record {} already stored, skipping insert", id);
        }
        Err(err) => return Err(err.into()),
    }

    if let Err(err) = artifacts.save_record(&record) {
        tracing::warn!("Failed to write sidecar for {}: {}", record.id, err);
    }

    save_image_with_retry(page, artifacts, &record).await;

    if let Err(err) = artifacts.archive_race(&record.id).await {
        tracing::warn!("Failed to archive {}: {}", record.id, err);
    }

    Ok(record)
}

/// Zips the columnar runner table into per-runner rows, every one
/// attributed to the parent record id.
fn attribute_runners(
    race_id: &str,
    table: &RunnerTable,
    page_url: &str,
) -> Result<Vec<RunnerEntry>, ExtractionError> {
    let rows = table.row_count().ok_or_else(|| ExtractionError {
        url: page_url.to_string(),
        what: "aligned runner columns",
    })?;

    Ok((0..rows)
        .map(|i| RunnerEntry {
            race_id: race_id.to_string(),
            horse_id: horse_id_from_url(&table.horse_urls[i]),
            ordinal: i as u32 + 1,
            place: table.place[i].clone(),
            number: table.number[i].clone(),
            name: table.name[i].clone(),
            jockey: table.jockey[i].clone(),
            trainer: table.trainer[i].clone(),
            actual_weight: table.actual_weight[i].clone(),
            declared_weight: table.declared_weight[i].clone(),
            draw: table.draw[i].clone(),
            length_behind_winner: table.length_behind_winner[i].clone(),
            running_positions: table.running_positions[i].clone(),
            finish_time: table.finish_time[i].clone(),
            win_odds: table.win_odds[i].clone(),
            horse_url: table.horse_urls[i].clone(),
        })
        .collect())
}

async fn save_image_with_retry<P, A>(page: &P, artifacts: &A, record: &RaceRecord)
where
    P: ResultsPage,
    A: ArtifactStore,
{
    for attempt in 1..=IMAGE_FETCH_TRIES {
        match page.fetch_image(&record.image_url).await {
            Ok(bytes) => {
                if let Err(err) = artifacts.save_image(&record.id, &bytes) {
                    tracing::warn!("Failed to save image for {}: {}", record.id, err);
                }
                return;
            }
            Err(err) => {
                tracing::warn!(
                    "Image fetch for {} failed (attempt {}): {}",
                    record.id,
                    attempt,
                    err
                );
            }
        }
    }
}
