//! Filesystem artifact storage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::traits::store::ArtifactStore;
use crate::types::graph::ArtifactId;

/// Writes each page as `<dir>/<artifact id>`.
///
/// Paths are only ever built from an [`ArtifactId`], which cannot contain
/// separators, so reads stay inside `dir`.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &ArtifactId) -> PathBuf {
        self.dir.join(id.as_str())
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn write(&self, id: &ArtifactId, html: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(id);
        tokio::fs::write(&path, html).await?;
        debug!(path = %path.display(), bytes = html.len(), "Artifact written");
        Ok(())
    }

    async fn read(&self, id: &ArtifactId) -> Result<String> {
        match tokio::fs::read_to_string(self.path_for(id)).await {
            Ok(html) => Ok(html),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExtractionError::not_found(format!("artifact {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
