//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage
//! trait.

use crate::model::RaceRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`.
    ///
    /// An unreachable or unwritable database is fatal for the run, so
    /// failures here surface as [`StorageError::Unavailable`].
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StorageError::Unavailable(format!("{}: {}", path.display(), e)))?;

        // journal_mode is the one pragma that reports its value back
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        initialize_schema(&conn).map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database, primarily for tests
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(error, _)
            if error.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl Storage for SqliteStorage {
    fn load_known_addresses(&self) -> StorageResult<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT source_url FROM race")?;
        let addresses = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(addresses)
    }

    fn load_no_event_addresses(&self) -> StorageResult<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT url FROM no_event")?;
        let addresses = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(addresses)
    }

    fn save_race(&mut self, record: &RaceRecord) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO race (id, date, race_number, race_class, distance, going, course,
             prize, pace, image_url, source_url, collected_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.id,
                record.date,
                record.race_number,
                record.fields.race_class,
                record.fields.distance,
                record.fields.going,
                record.fields.course,
                record.fields.prize,
                record.fields.pace,
                record.image_url,
                record.source_url,
                now,
            ],
        );

        if let Err(err) = inserted {
            return if is_constraint_violation(&err) {
                Err(StorageError::DuplicateKey(record.id.clone()))
            } else {
                Err(err.into())
            };
        }

        for runner in &record.runners {
            tx.execute(
                "INSERT INTO runner (race_id, horse_id, ordinal, place, number, name, jockey,
                 trainer, actual_weight, declared_weight, draw, length_behind_winner,
                 running_positions, finish_time, win_odds, horse_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    runner.race_id,
                    runner.horse_id,
                    runner.ordinal,
                    runner.place,
                    runner.number,
                    runner.name,
                    runner.jockey,
                    runner.trainer,
                    runner.actual_weight,
                    runner.declared_weight,
                    runner.draw,
                    runner.length_behind_winner,
                    runner.running_positions,
                    runner.finish_time,
                    runner.win_odds,
                    runner.horse_url,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn save_no_event(&mut self, url: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO no_event (url, recorded_at) VALUES (?1, ?2)",
            params![url, now],
        )?;
        Ok(())
    }

    fn count_races(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM race")
    }

    fn count_runners(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM runner")
    }

    fn count_no_event(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM no_event")
    }
}
