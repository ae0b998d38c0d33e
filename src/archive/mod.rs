//! Artifact persistence for collected races.
//!
//! Each race gets a folder named after its record id holding a
//! `data.json` sidecar and the result image. A run can optionally upload
//! every completed folder to blob storage; the local layout and the
//! uploaded keys mirror each other.

mod local;
mod s3;

pub use local::LocalArtifacts;
pub use s3::S3Artifacts;

use crate::model::RaceRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while writing or uploading race artifacts
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Upload failed for {key}: {message}")]
    Upload { key: String, message: String },
}

/// Result type for artifact operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Trait for artifact storage backends
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Writes the record's `data.json` sidecar into the race folder.
    fn save_record(&self, record: &RaceRecord) -> ArchiveResult<()>;

    /// Writes the result image into the race folder.
    fn save_image(&self, race_id: &str, bytes: &[u8]) -> ArchiveResult<()>;

    /// Uploads the race folder's files to blob storage.
    async fn archive_race(&self, race_id: &str) -> ArchiveResult<()>;
}
