//! In-memory job and saved-word storage.
//!
//! Data lives for the lifetime of the process. Nothing is persisted.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::traits::store::{JobStore, JobUpdate, SavedWordStore};
use crate::types::{
    job::{JobId, ProcessingJob},
    saved::{SaveOutcome, SavedWord},
};

/// User id for callers that identify themselves with nothing.
pub const DEFAULT_USER: &str = "default_user";

/// Concurrency-safe job map shared by workers and pollers.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobId, ProcessingJob>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self) -> Result<ProcessingJob> {
        let mut jobs = self.jobs.write().await;

        // Millisecond ids collide under bursts; step forward until free.
        let mut millis = Utc::now().timestamp_millis();
        while jobs.contains_key(&JobId::from_millis(millis)) {
            millis += 1;
        }

        let job = ProcessingJob::pending(JobId::from_millis(millis));
        jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    async fn get(&self, id: &JobId) -> Result<Option<ProcessingJob>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn update(
        &self,
        id: &JobId,
        update: JobUpdate,
    ) -> Result<Option<ProcessingJob>> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.get_mut(id).map(|job| {
            update(job);
            job.clone()
        }))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.jobs.read().await.len())
    }
}

/// Per-user saved words, in insertion order.
#[derive(Default)]
pub struct MemoryWordStore {
    words: RwLock<HashMap<String, Vec<SavedWord>>>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedWordStore for MemoryWordStore {
    async fn list(&self, user_id: &str) -> Result<Vec<SavedWord>> {
        Ok(self
            .words
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, user_id: &str, word: SavedWord) -> Result<SaveOutcome> {
        // Check and insert under one write lock so concurrent saves of the
        // same word cannot both succeed.
        let mut words = self.words.write().await;
        let saved = words.entry(user_id.to_string()).or_default();
        if saved.iter().any(|w| w.word == word.word) {
            return Ok(SaveOutcome::already_saved());
        }
        saved.push(word);
        Ok(SaveOutcome::inserted())
    }

    async fn remove(&self, user_id: &str, surface_form: &str) -> Result<bool> {
        let mut words = self.words.write().await;
        let Some(saved) = words.get_mut(user_id) else {
            return Ok(false);
        };
        let before = saved.len();
        saved.retain(|w| w.word != surface_form);
        Ok(saved.len() != before)
    }

    async fn contains(&self, user_id: &str, surface_form: &str) -> Result<bool> {
        Ok(self
            .words
            .read()
            .await
            .get(user_id)
            .is_some_and(|saved| saved.iter().any(|w| w.word == surface_form)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::job::JobState;
    use crate::types::vocabulary::VocabularyEntry;

    fn word(surface: &str) -> SavedWord {
        SavedWord::from(&VocabularyEntry::new(surface, "t", "d", "e", "et"))
    }

    #[tokio::test]
    async fn test_job_ids_are_unique_under_bursts() {
        let store = MemoryJobStore::new();
        let mut ids = Vec::new();
        for _ in 0..50 {
            ids.push(store.create().await.unwrap().id);
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
        assert_eq!(store.count().await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_update_unknown_job_is_none() {
        let store = MemoryJobStore::new();
        let result = store
            .update(
                &JobId::new("missing"),
                Box::new(|job: &mut ProcessingJob| job.state = JobState::Failed),
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_returns_new_state() {
        let store = MemoryJobStore::new();
        let job = store.create().await.unwrap();

        let updated = store
            .update(
                &job.id,
                Box::new(|job: &mut ProcessingJob| {
                    job.advance(30, "fetching");
                }),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.state, JobState::Running);
        assert_eq!(store.get(&job.id).await.unwrap().unwrap().progress, 30);
    }

    #[tokio::test]
    async fn test_saving_twice_keeps_one_record() {
        let store = MemoryWordStore::new();

        let first = store.add("alice", word("圖書館")).await.unwrap();
        let second = store.add("alice", word("圖書館")).await.unwrap();

        assert!(!first.exists);
        assert!(second.exists);
        assert_eq!(store.list("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = MemoryWordStore::new();
        store.add("alice", word("看書")).await.unwrap();

        assert!(store.contains("alice", "看書").await.unwrap());
        assert!(!store.contains("bob", "看書").await.unwrap());
        assert!(store.list("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryWordStore::new();
        store.add("alice", word("看書")).await.unwrap();
        store.add("alice", word("學生")).await.unwrap();

        assert!(store.remove("alice", "看書").await.unwrap());
        assert!(!store.remove("alice", "看書").await.unwrap());
        assert!(!store.remove("nobody", "看書").await.unwrap());

        let left = store.list("alice").await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].word, "學生");
    }
}
