//! Remote text-generation abstraction.
//!
//! The pipeline treats the model as a black box: one prompt string in,
//! generated text out. Provider failures come back as
//! [`ExtractionError::Generation`](crate::error::ExtractionError::Generation)
//! and fail only the job that made the call.

use async_trait::async_trait;

use crate::error::Result;
use crate::security::SecretString;

/// A text-generation provider.
///
/// Implementations make exactly one billed call per `generate` and never
/// retry or cache; the same prompt twice is two calls.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for `prompt`, authenticating with `credential`.
    async fn generate(&self, prompt: &str, credential: &SecretString) -> Result<String>;

    /// Model identifier (for logging).
    fn model(&self) -> &str;
}
