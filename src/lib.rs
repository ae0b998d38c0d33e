//! Paddock: a date-indexed race-results collector
//!
//! This crate crawls a racing results site organized by meeting date,
//! discovers the day's races from each date's root page, and persists one
//! structured record per race while skipping pages collected on earlier
//! runs.

pub mod archive;
pub mod config;
pub mod crawler;
pub mod dates;
pub mod frontier;
pub mod model;
pub mod page;
pub mod storage;

use thiserror::Error;

/// Main error type for paddock operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Day count must be a positive number of days, got {0}")]
    InvalidDayCount(i64),

    #[error("Navigation error: {0}")]
    Navigation(#[from] page::NavigationError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] page::ExtractionError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Archive error: {0}")]
    Archive(#[from] archive::ArchiveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for paddock operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlController, RunSummary};
pub use frontier::Frontier;
pub use model::{CrawlTarget, RaceRecord, RunnerEntry, TargetKind};
