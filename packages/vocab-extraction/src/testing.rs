//! Testing utilities including mock implementations.
//!
//! Use these to drive the pipeline without network access or billed model
//! calls. See also [`MockFetcher`](crate::ingestors::MockFetcher).

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ExtractionError, Result};
use crate::security::SecretString;
use crate::traits::generator::Generator;

pub use crate::ingestors::MockFetcher;

/// A mock text generator.
///
/// Replies are chosen by the first registered marker that appears in the
/// prompt, falling back to the default response. Clones share state, so a
/// test can keep a handle for assertions after handing one to a pipeline.
#[derive(Clone, Default)]
pub struct MockGenerator {
    default_response: Arc<RwLock<Option<String>>>,
    routed: Arc<RwLock<Vec<(String, String)>>>,
    error: Arc<RwLock<Option<String>>>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<MockGeneratorCall>>>,
}

/// Record of a call made to the mock generator.
#[derive(Debug, Clone)]
pub struct MockGeneratorCall {
    pub prompt: String,
    pub credential: String,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used when no marker matches.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = Some(response.into());
        self
    }

    /// Reply with `response` when the prompt contains `marker`.
    pub fn with_response_for(self, marker: impl Into<String>, response: impl Into<String>) -> Self {
        self.routed
            .write()
            .unwrap()
            .push((marker.into(), response.into()));
        self
    }

    /// Fail every call with a generation error carrying `message`.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        *self.error.write().unwrap() = Some(message.into());
        self
    }

    /// Sleep before answering, to simulate a slow provider.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<MockGeneratorCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }

    /// Credentials seen, exposed, in call order.
    pub fn credentials(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.credential).collect()
    }

    fn reply_for(&self, prompt: &str) -> Option<String> {
        self.routed
            .read()
            .unwrap()
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default_response.read().unwrap().clone())
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str, credential: &SecretString) -> Result<String> {
        self.calls.write().unwrap().push(MockGeneratorCall {
            prompt: prompt.to_string(),
            credential: credential.expose().to_string(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.error.read().unwrap().clone();
        if let Some(message) = failure {
            return Err(ExtractionError::generation(message));
        }

        Ok(self.reply_for(prompt).unwrap_or_else(|| "[]".to_string()))
    }

    fn model(&self) -> &str {
        "mock-generator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_routes_by_marker() {
        let generator = MockGenerator::new()
            .with_response("default")
            .with_response_for("圖書館", "library");
        let key = SecretString::new("k");

        assert_eq!(generator.generate("去圖書館", &key).await.unwrap(), "library");
        assert_eq!(generator.generate("其他", &key).await.unwrap(), "default");
        assert_eq!(generator.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_error_mode() {
        let generator = MockGenerator::new().with_error("rate limited");
        let err = generator
            .generate("x", &SecretString::new("k"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }
}
