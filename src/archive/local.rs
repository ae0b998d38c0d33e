//! Local-directory artifact storage.

use crate::archive::{ArchiveResult, ArtifactStore};
use crate::model::RaceRecord;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

/// Artifact storage rooted at a local directory: one sub-folder per race
/// id, holding `data.json` and the result image.
#[derive(Debug, Clone)]
pub struct LocalArtifacts {
    root: PathBuf,
}

impl LocalArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The folder holding one race's artifacts
    pub fn race_dir(&self, race_id: &str) -> PathBuf {
        self.root.join(race_id)
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifacts {
    fn save_record(&self, record: &RaceRecord) -> ArchiveResult<()> {
        let dir = self.race_dir(&record.id);
        fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(dir.join("data.json"), json)?;
        Ok(())
    }

    fn save_image(&self, race_id: &str, bytes: &[u8]) -> ArchiveResult<()> {
        let dir = self.race_dir(race_id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("1.jpg"), bytes)?;
        Ok(())
    }

    async fn archive_race(&self, race_id: &str) -> ArchiveResult<()> {
        // Local-only runs keep everything on disk; there is nowhere to
        // upload to.
        tracing::debug!("No archive bucket configured, keeping {} local", race_id);
        Ok(())
    }
}

/// Lists the files inside a race folder, for upload
pub(crate) fn folder_files(dir: &Path) -> ArchiveResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
