//! Storage module for persisting collected results
//!
//! This module handles all database operations for the collector:
//! - SQLite database initialization and schema management
//! - Race and runner record persistence
//! - The no-event address list
//! - The address sets the crawl frontier is loaded from

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};
