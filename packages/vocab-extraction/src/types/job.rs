//! Processing jobs and the status reports returned to pollers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::graph::ArtifactId;

/// Opaque job identifier (millisecond timestamp at submission).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id derived from a timestamp in milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a stored job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Output of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub artifact: ArtifactId,
    pub word_count: usize,
}

/// One asynchronous unit of work: fetch, extract, classify, render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingJob {
    pub id: JobId,
    pub state: JobState,
    /// 0..=100, never decreases
    pub progress: u8,
    pub message: String,
    pub result: Option<JobResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcessingJob {
    /// A freshly submitted job.
    pub fn pending(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: JobState::Pending,
            progress: 0,
            message: "Queued for processing".to_string(),
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `Running` at `progress`. Ignored once terminal; progress is
    /// clamped so it never goes backwards.
    pub fn advance(&mut self, progress: u8, message: impl Into<String>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = JobState::Running;
        self.progress = self.progress.max(progress.min(100));
        self.message = message.into();
        self.updated_at = Utc::now();
        true
    }

    pub fn complete(&mut self, result: JobResult, message: impl Into<String>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = JobState::Completed;
        self.progress = 100;
        self.message = message.into();
        self.result = Some(result);
        self.updated_at = Utc::now();
        true
    }

    /// Mark failed. Progress stays where the failing stage left it.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = JobState::Failed;
        self.message = message.into();
        self.updated_at = Utc::now();
        true
    }
}

/// Status as seen by a poller. `NotFound` is a status, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    NotFound,
}

impl From<JobState> for JobStatus {
    fn from(state: JobState) -> Self {
        match state {
            JobState::Pending => Self::Pending,
            JobState::Running => Self::Running,
            JobState::Completed => Self::Completed,
            JobState::Failed => Self::Failed,
        }
    }
}

/// Poll response for one job id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
}

impl StatusReport {
    pub fn not_found() -> Self {
        Self {
            status: JobStatus::NotFound,
            progress: 0,
            message: "No job with that id".to_string(),
            artifact: None,
            word_count: None,
        }
    }
}

impl From<&ProcessingJob> for StatusReport {
    fn from(job: &ProcessingJob) -> Self {
        Self {
            status: job.state.into(),
            progress: job.progress,
            message: job.message.clone(),
            artifact: job.result.as_ref().map(|r| r.artifact.clone()),
            word_count: job.result.as_ref().map(|r| r.word_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ArtifactId {
        ArtifactId::parse("chinese_graph_1words_20250101_120000.html").unwrap()
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut job = ProcessingJob::pending(JobId::from_millis(1));
        job.advance(60, "extracting");
        job.advance(30, "late update");

        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.progress, 60);
        assert_eq!(job.message, "late update");
    }

    #[test]
    fn test_terminal_state_is_immutable() {
        let mut job = ProcessingJob::pending(JobId::from_millis(2));
        assert!(job.complete(
            JobResult {
                artifact: artifact(),
                word_count: 1
            },
            "done"
        ));

        assert!(!job.fail("too late"));
        assert!(!job.advance(50, "too late"));
        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.message, "done");
    }

    #[test]
    fn test_not_found_report_serializes_as_status() {
        let json = serde_json::to_value(StatusReport::not_found()).unwrap();
        assert_eq!(json["status"], "not_found");
        assert!(json.get("artifact").is_none());
    }
}
