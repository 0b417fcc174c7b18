//! Vocabulary Extraction Library
//!
//! Turns a web page or a block of text into an interactive vocabulary graph:
//!
//! 1. Fetch the document (or take literal text), convert it to Markdown and
//!    cap it at 10,000 characters
//! 2. Ask a text-generation model for a JSON vocabulary list
//! 3. Parse the reply tolerantly (code fences and stray prose are ignored)
//! 4. Tag each word with its TOCFL level from a static reference table
//! 5. Render a self-contained force-directed HTML page
//!
//! Each submission becomes a background job whose progress can be polled.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vocab_extraction::{
//!     FileArtifactStore, HttpFetcher, JobRequest, LanguageProfile, LevelTable,
//!     MemoryJobStore, Pipeline, ValidatedFetcher,
//! };
//! use vocab_extraction::ai::Gemini;
//!
//! let pipeline = Pipeline::new(
//!     ValidatedFetcher::new(HttpFetcher::new()?),
//!     Gemini::new(),
//!     MemoryJobStore::new(),
//!     FileArtifactStore::new("artifacts"),
//! )
//! .with_levels(LevelTable::load("data/tocfl_words.csv"))
//! .with_default_credential(api_key);
//!
//! let job_id = pipeline
//!     .submit(JobRequest::url("https://example.com/news", LanguageProfile::Chinese))
//!     .await?;
//! let status = pipeline.status(&job_id).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Fetcher, generator, and store abstractions
//! - [`types`] - Documents, vocabulary entries, jobs, graph artifacts
//! - [`pipeline`] - Prompts, parsing, classification, rendering, orchestration
//! - [`ingestors`] - HTTP and mock fetchers
//! - [`stores`] - In-memory and filesystem storage
//! - [`security`] - Credential handling and SSRF protection
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod ingestors;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "gemini")]
pub mod ai;

// Re-export core types at crate root
pub use error::{ExtractionError, FetchError, SecurityError};
pub use traits::{
    fetcher::{Fetcher, ValidatedFetcher},
    generator::Generator,
    store::{ArtifactStore, JobStore, JobUpdate, SavedWordStore},
};
pub use types::{
    document::{DocumentOrigin, SourceDocument, MAX_CONTENT_CHARS},
    graph::{ArtifactId, GraphArtifact, GraphEdge, GraphNode},
    job::{JobId, JobResult, JobState, JobStatus, ProcessingJob, StatusReport},
    request::{JobRequest, JobSource, JobSubmission, SourceMode},
    saved::{SaveOutcome, SavedWord},
    vocabulary::{Level, LevelCategory, LevelTag, VocabularyEntry, MISSING_FIELD},
};

pub use pipeline::{
    parse_vocabulary_response, LanguageProfile, LevelInfo, LevelTable, Pipeline,
};

pub use ingestors::{HttpFetcher, MockFetcher};
pub use security::{normalize_url, SecretString, UrlValidator};
pub use stores::{FileArtifactStore, MemoryJobStore, MemoryWordStore, DEFAULT_USER};

pub use testing::MockGenerator;
