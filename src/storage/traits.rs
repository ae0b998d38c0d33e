//! Storage trait and error types

use crate::model::RaceRecord;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record with this identifier already exists. Expected when the
    /// in-memory frontier is stale relative to the database; callers log
    /// it and move on.
    #[error("Duplicate record id: {0}")]
    DuplicateKey(String),

    /// The database could not be opened or read at startup. Fatal for
    /// the whole run.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the relational persistence backend
///
/// One implementation ships with the crate (SQLite); the controller and
/// processor depend only on this interface.
pub trait Storage {
    /// Source addresses of every saved race record.
    fn load_known_addresses(&self) -> StorageResult<HashSet<String>>;

    /// Addresses recorded as having no event to collect.
    fn load_no_event_addresses(&self) -> StorageResult<HashSet<String>>;

    /// Saves a race and its runner rows in one transaction.
    ///
    /// Fails with [`StorageError::DuplicateKey`] when a record with the
    /// same id already exists; nothing is written in that case.
    fn save_race(&mut self, record: &RaceRecord) -> StorageResult<()>;

    /// Records that an address has no event. Saving the same address
    /// twice is not an error.
    fn save_no_event(&mut self, url: &str) -> StorageResult<()>;

    /// Number of stored race records.
    fn count_races(&self) -> StorageResult<u64>;

    /// Number of stored runner rows.
    fn count_runners(&self) -> StorageResult<u64>;

    /// Number of recorded no-event addresses.
    fn count_no_event(&self) -> StorageResult<u64>;
}
