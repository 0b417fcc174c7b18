//! Storage traits for jobs, saved words, and rendered artifacts.
//!
//! - `JobStore`: concurrency-safe job status map shared by workers and pollers
//! - `SavedWordStore`: per-user saved words, deduplicated by surface form
//! - `ArtifactStore`: rendered HTML pages addressed by [`ArtifactId`]

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    graph::ArtifactId,
    job::{JobId, ProcessingJob},
    saved::{SaveOutcome, SavedWord},
};

/// Mutation applied to a job while the store holds its lock.
pub type JobUpdate = Box<dyn for<'a> FnOnce(&'a mut ProcessingJob) + Send>;

/// Job status records.
///
/// Implementations must be safe to read and write from many tasks at once.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a `Pending` job with a fresh timestamp-derived id.
    async fn create(&self) -> Result<ProcessingJob>;

    /// Get a job by id.
    async fn get(&self, id: &JobId) -> Result<Option<ProcessingJob>>;

    /// Apply `update` to the job under the store's lock.
    ///
    /// Returns the job after the update, or `None` for an unknown id.
    async fn update(
        &self,
        id: &JobId,
        update: JobUpdate,
    ) -> Result<Option<ProcessingJob>>;

    /// Number of tracked jobs.
    async fn count(&self) -> Result<usize>;
}

/// Per-user saved words keyed by literal surface form.
#[async_trait]
pub trait SavedWordStore: Send + Sync {
    /// All words saved by `user_id`, oldest first.
    async fn list(&self, user_id: &str) -> Result<Vec<SavedWord>>;

    /// Insert unless the surface form is already saved for this user.
    async fn add(&self, user_id: &str, word: SavedWord) -> Result<SaveOutcome>;

    /// Remove a saved word. Returns whether anything was removed.
    async fn remove(&self, user_id: &str, surface_form: &str) -> Result<bool>;

    /// Membership check used before insert.
    async fn contains(&self, user_id: &str, surface_form: &str) -> Result<bool> {
        Ok(self
            .list(user_id)
            .await?
            .iter()
            .any(|w| w.word == surface_form))
    }
}

/// Rendered HTML pages.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn write(&self, id: &ArtifactId, html: &str) -> Result<()>;

    /// Read a page back. Unknown ids are `ExtractionError::NotFound`.
    async fn read(&self, id: &ArtifactId) -> Result<String>;
}
