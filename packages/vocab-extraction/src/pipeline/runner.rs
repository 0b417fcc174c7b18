//! Job orchestration: submit, run stages in order, track status.
//!
//! Each submitted job runs on its own tokio task. Stages within a job are
//! strictly sequential (fetch → extract → parse → classify → render); there
//! is no ordering between jobs and no cancellation.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::extract::parse_vocabulary_response;
use super::levels::LevelTable;
use super::profile::LanguageProfile;
use super::prompts::format_extract_prompt;
use super::render::{build_edges, build_nodes, render_page};
use crate::error::{ExtractionError, Result};
use crate::security::SecretString;
use crate::traits::{
    fetcher::Fetcher,
    generator::Generator,
    store::{ArtifactStore, JobStore},
};
use crate::types::{
    document::SourceDocument,
    graph::{ArtifactId, GraphArtifact},
    job::{JobId, JobResult, ProcessingJob, StatusReport},
    request::{JobRequest, JobSource},
    vocabulary::VocabularyEntry,
};

/// Upper bound on one remote-model call unless configured otherwise.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Progress milestones reported to pollers.
pub mod progress {
    pub const STARTED: u8 = 10;
    pub const FETCHING: u8 = 30;
    pub const EXTRACTING: u8 = 60;
    pub const PARSING: u8 = 80;
    pub const CLASSIFYING: u8 = 85;
    pub const RENDERING: u8 = 90;
}

/// The extraction pipeline and its job registry.
///
/// Cheap to clone; every clone shares the same stores and clients.
///
/// ```rust,ignore
/// let pipeline = Pipeline::new(fetcher, generator, MemoryJobStore::new(), artifacts)
///     .with_levels(LevelTable::load("data/tocfl_words.csv"))
///     .with_default_credential(api_key);
///
/// let job_id = pipeline.submit(JobRequest::text("學生每天去圖書館看書。", LanguageProfile::Chinese)).await?;
/// let report = pipeline.status(&job_id).await?;
/// ```
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    generator: Arc<dyn Generator>,
    levels: Arc<LevelTable>,
    jobs: Arc<dyn JobStore>,
    artifacts: Arc<dyn ArtifactStore>,
    default_credential: Option<SecretString>,
    generation_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        fetcher: impl Fetcher + 'static,
        generator: impl Generator + 'static,
        jobs: impl JobStore + 'static,
        artifacts: impl ArtifactStore + 'static,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            generator: Arc::new(generator),
            levels: Arc::new(LevelTable::empty()),
            jobs: Arc::new(jobs),
            artifacts: Arc::new(artifacts),
            default_credential: None,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_levels(mut self, levels: LevelTable) -> Self {
        self.levels = Arc::new(levels);
        self
    }

    /// Credential used when a request does not bring its own.
    pub fn with_default_credential(mut self, credential: impl Into<SecretString>) -> Self {
        let credential = credential.into();
        self.default_credential = (!credential.is_blank()).then_some(credential);
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub async fn job_count(&self) -> Result<usize> {
        self.jobs.count().await
    }

    /// Register a job and start it in the background.
    ///
    /// Returns as soon as the job exists; a request with no usable
    /// credential is rejected here, before any job is created.
    pub async fn submit(&self, request: JobRequest) -> Result<JobId> {
        self.credential_for(&request)?;

        let job = self.jobs.create().await?;
        let job_id = job.id.clone();
        info!(
            job_id = %job_id,
            profile = %request.profile,
            source = source_kind(&request.source),
            "Job submitted"
        );

        let pipeline = self.clone();
        let spawned_id = job_id.clone();
        tokio::spawn(async move {
            pipeline.process(&spawned_id, request).await;
        });

        Ok(job_id)
    }

    /// Run every stage of `job_id` to completion on the current task.
    ///
    /// Never returns an error: a failing stage marks the job `Failed` with
    /// the error text and the process carries on.
    pub async fn process(&self, job_id: &JobId, request: JobRequest) {
        match self.run(job_id, &request).await {
            Ok(result) => {
                info!(
                    job_id = %job_id,
                    artifact = %result.artifact,
                    word_count = result.word_count,
                    "Job completed"
                );
                let message = format!("Extracted {} words", result.word_count);
                self.record(job_id, move |job| {
                    job.complete(result, message);
                })
                .await;
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Job failed");
                let message = e.to_string();
                self.record(job_id, move |job| {
                    job.fail(message);
                })
                .await;
            }
        }
    }

    /// Status for a poller. Unknown ids are a `NotFound` report.
    pub async fn status(&self, job_id: &JobId) -> Result<StatusReport> {
        Ok(self
            .jobs
            .get(job_id)
            .await?
            .map(|job| StatusReport::from(&job))
            .unwrap_or_else(StatusReport::not_found))
    }

    /// Rendered page for a client-supplied artifact reference.
    pub async fn artifact(&self, raw_id: &str) -> Result<String> {
        let id = ArtifactId::parse(raw_id)?;
        self.artifacts.read(&id).await
    }

    async fn run(&self, job_id: &JobId, request: &JobRequest) -> Result<JobResult> {
        let credential = self.credential_for(request)?;
        let profile = request.profile;

        self.stage(job_id, progress::STARTED, "Processing started").await?;

        let document = match &request.source {
            JobSource::Url(url) => {
                self.stage(job_id, progress::FETCHING, "Fetching web page").await?;
                self.fetcher.fetch(url).await?
            }
            JobSource::Text(text) => {
                self.stage(job_id, progress::FETCHING, "Reading submitted text").await?;
                SourceDocument::from_text(text.as_str())
            }
        };
        debug!(
            job_id = %job_id,
            chars = document.char_len(),
            truncated = document.truncated(),
            "Document ready"
        );

        self.stage(job_id, progress::EXTRACTING, "Extracting vocabulary").await?;
        let prompt = format_extract_prompt(profile, document.content());
        let response = self.generate(job_id, &prompt, &credential).await?;

        self.stage(job_id, progress::PARSING, "Parsing vocabulary").await?;
        let entries = parse_vocabulary_response(&response, profile)?;
        info!(job_id = %job_id, entry_count = entries.len(), "Vocabulary parsed");

        let entries = if profile.uses_level_classifier() {
            self.stage(job_id, progress::CLASSIFYING, "Classifying levels").await?;
            self.classify(entries)
        } else {
            entries
        };

        self.stage(job_id, progress::RENDERING, "Rendering graph").await?;
        let graph = self.render(&document, profile, &entries)?;
        let html = render_page(profile, document.origin().label(), &graph.nodes, &graph.edges)?;
        self.artifacts.write(&graph.artifact, &html).await?;

        Ok(JobResult {
            artifact: graph.artifact,
            word_count: graph.nodes.len(),
        })
    }

    async fn generate(
        &self,
        job_id: &JobId,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<String> {
        debug!(
            job_id = %job_id,
            model = self.generator.model(),
            prompt_chars = prompt.chars().count(),
            "Calling model"
        );
        match tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(prompt, credential),
        )
        .await
        {
            Ok(response) => response,
            Err(_) => {
                warn!(job_id = %job_id, timeout = ?self.generation_timeout, "Model call timed out");
                Err(ExtractionError::generation(format!(
                    "model call exceeded {}s",
                    self.generation_timeout.as_secs()
                )))
            }
        }
    }

    fn classify(&self, entries: Vec<VocabularyEntry>) -> Vec<VocabularyEntry> {
        entries
            .into_iter()
            .map(|entry| {
                let level = self.levels.classify(&entry.surface_form);
                entry.with_level(level)
            })
            .collect()
    }

    fn render(
        &self,
        document: &SourceDocument,
        profile: LanguageProfile,
        entries: &[VocabularyEntry],
    ) -> Result<GraphArtifact> {
        let nodes = build_nodes(entries);
        let edges = build_edges(nodes.len(), &mut rand::thread_rng());
        let artifact = ArtifactId::generate(profile.slug(), nodes.len(), Utc::now());
        debug!(
            source = document.origin().label(),
            nodes = nodes.len(),
            edges = edges.len(),
            "Graph built"
        );
        Ok(GraphArtifact {
            nodes,
            edges,
            artifact,
        })
    }

    fn credential_for(&self, request: &JobRequest) -> Result<SecretString> {
        request
            .credential
            .as_ref()
            .filter(|c| !c.is_blank())
            .or(self.default_credential.as_ref())
            .cloned()
            .ok_or_else(|| ExtractionError::validation("an API key is required"))
    }

    async fn stage(&self, job_id: &JobId, progress: u8, message: &'static str) -> Result<()> {
        debug!(job_id = %job_id, progress, message, "Stage");
        let updated = self
            .jobs
            .update(
                job_id,
                Box::new(move |job: &mut ProcessingJob| {
                    job.advance(progress, message);
                }),
            )
            .await?;
        if updated.is_none() {
            return Err(ExtractionError::not_found(format!("job {job_id}")));
        }
        Ok(())
    }

    /// Final status write. Store failures are logged, not propagated.
    async fn record<F>(&self, job_id: &JobId, update: F)
    where
        F: FnOnce(&mut ProcessingJob) + Send + 'static,
    {
        if let Err(e) = self.jobs.update(job_id, Box::new(update)).await {
            error!(job_id = %job_id, error = %e, "Could not record final job state");
        }
    }
}

fn source_kind(source: &JobSource) -> &'static str {
    match source {
        JobSource::Url(_) => "url",
        JobSource::Text(_) => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestors::MockFetcher;
    use crate::stores::{FileArtifactStore, MemoryJobStore};
    use crate::testing::MockGenerator;
    use crate::types::job::{JobState, JobStatus};

    const REPLY: &str = r#"[{"chinese":"圖書館","english":"library","definition":"a place to read","example_chinese":"我去圖書館。","example_english":"I go to the library."},{"chinese":"看書","english":"to read","definition":"read books","example_chinese":"我喜歡看書。","example_english":"I like reading."}]"#;

    fn pipeline(generator: MockGenerator, dir: &std::path::Path) -> Pipeline {
        Pipeline::new(
            MockFetcher::new().with_page("https://news.example/a", "學生每天去圖書館看書。"),
            generator,
            MemoryJobStore::new(),
            FileArtifactStore::new(dir),
        )
        .with_levels(LevelTable::parse("word,deng,ji\n圖書館,進階,第3級\n"))
        .with_default_credential("test-key")
    }

    async fn processed(pipeline: &Pipeline, request: JobRequest) -> ProcessingJob {
        let job = pipeline.jobs.create().await.unwrap();
        pipeline.process(&job.id, request).await;
        pipeline.jobs.get(&job.id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_url_job_runs_every_stage() {
        let dir = tempfile::tempdir().unwrap();
        let generator = MockGenerator::new().with_response(REPLY);
        let pipeline = pipeline(generator.clone(), dir.path());

        let job = processed(
            &pipeline,
            JobRequest::url("https://news.example/a", LanguageProfile::Chinese),
        )
        .await;

        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.progress, 100);
        let result = job.result.unwrap();
        assert_eq!(result.word_count, 2);

        let html = pipeline.artifact(result.artifact.as_str()).await.unwrap();
        assert!(html.contains("\"level\":\"B3\""));
        assert!(html.contains("\"level\":\"Unclassified\""));

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("學生每天去圖書館看書。"));
    }

    #[tokio::test]
    async fn test_korean_profile_skips_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let reply = r#"[{"korean":"도서관","chinese":"圖書館"}]"#;
        let pipeline = pipeline(MockGenerator::new().with_response(reply), dir.path());

        let job = processed(&pipeline, JobRequest::text("도서관", LanguageProfile::Korean)).await;

        let result = job.result.unwrap();
        assert!(result.artifact.as_str().starts_with("korean_graph_1words_"));
        let html = pipeline.artifact(result.artifact.as_str()).await.unwrap();
        assert!(html.contains("\"level\":\"Unclassified\""));
    }

    #[tokio::test]
    async fn test_generation_error_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(MockGenerator::new().with_error("quota exceeded"), dir.path());

        let job = processed(&pipeline, JobRequest::text("你好", LanguageProfile::Chinese)).await;

        assert_eq!(job.state, JobState::Failed);
        assert_eq!(job.progress, progress::EXTRACTING);
        assert!(job.message.contains("quota exceeded"));
        assert!(job.result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_error_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(MockGenerator::new().with_response(REPLY), dir.path());

        let job = processed(
            &pipeline,
            JobRequest::url("https://missing.example/", LanguageProfile::Chinese),
        )
        .await;

        assert_eq!(job.state, JobState::Failed);
        assert!(job.message.contains("404"));
    }

    #[tokio::test]
    async fn test_slow_model_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let generator = MockGenerator::new()
            .with_response(REPLY)
            .with_delay(Duration::from_millis(200));
        let pipeline = pipeline(generator, dir.path())
            .with_generation_timeout(Duration::from_millis(20));

        let job = processed(&pipeline, JobRequest::text("你好", LanguageProfile::Chinese)).await;

        assert_eq!(job.state, JobState::Failed);
        assert!(job.message.contains("exceeded"));
    }

    #[tokio::test]
    async fn test_missing_credential_rejected_before_job_exists() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(
            MockFetcher::new(),
            MockGenerator::new(),
            MemoryJobStore::new(),
            FileArtifactStore::new(dir.path()),
        );

        let err = pipeline
            .submit(JobRequest::text("你好", LanguageProfile::Chinese))
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Validation { .. }));
        assert_eq!(pipeline.job_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_request_credential_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        let generator = MockGenerator::new().with_response("[]");
        let pipeline = pipeline(generator.clone(), dir.path());

        processed(
            &pipeline,
            JobRequest::text("你好", LanguageProfile::Chinese).with_credential("user-key"),
        )
        .await;

        assert_eq!(generator.credentials(), vec!["user-key".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_job_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(MockGenerator::new(), dir.path());

        let report = pipeline.status(&JobId::new("12345")).await.unwrap();
        assert_eq!(report.status, JobStatus::NotFound);
    }

    #[tokio::test]
    async fn test_artifact_lookup_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(MockGenerator::new(), dir.path());

        let err = pipeline.artifact("../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));

        let err = pipeline
            .artifact("chinese_graph_3words_20250101_000000.html")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound { .. }));
    }
}
