//! S3 archive storage.
//!
//! Wraps [`LocalArtifacts`] and, when a race completes, uploads its
//! folder to a bucket under `{prefix}/{race-id}/{file}`.

use crate::archive::local::folder_files;
use crate::archive::{ArchiveError, ArchiveResult, ArtifactStore, LocalArtifacts};
use crate::model::RaceRecord;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::fs;

/// Artifact storage that mirrors completed race folders into S3
pub struct S3Artifacts {
    local: LocalArtifacts,
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Artifacts {
    pub fn new(
        local: LocalArtifacts,
        client: Client,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            local,
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Builds an S3-backed store from the ambient AWS environment
    /// (credentials and region resolved the standard SDK way).
    pub async fn from_env(
        local: LocalArtifacts,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(local, Client::new(&config), bucket, prefix)
    }

    fn object_key(&self, race_id: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.prefix.trim_end_matches('/'),
            race_id,
            file_name
        )
    }
}

#[async_trait]
impl ArtifactStore for S3Artifacts {
    fn save_record(&self, record: &RaceRecord) -> ArchiveResult<()> {
        self.local.save_record(record)
    }

    fn save_image(&self, race_id: &str, bytes: &[u8]) -> ArchiveResult<()> {
        self.local.save_image(race_id, bytes)
    }

    async fn archive_race(&self, race_id: &str) -> ArchiveResult<()> {
        let dir = self.local.race_dir(race_id);
        let files = folder_files(&dir)?;

        for path in files {
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("artifact");
            let key = self.object_key(race_id, file_name);
            let bytes = fs::read(&path)?;

            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(&key)
                .body(ByteStream::from(bytes))
                .send()
                .await
                .map_err(|e| ArchiveError::Upload {
                    key: key.clone(),
                    message: e.to_string(),
                })?;

            tracing::info!("Uploaded s3://{}/{}", self.bucket, key);
        }

        Ok(())
    }
}
