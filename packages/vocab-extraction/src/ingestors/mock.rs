//! Mock fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;
use crate::types::document::{DocumentOrigin, SourceDocument};

/// Fetcher returning canned content per URL.
///
/// Unknown URLs answer with HTTP 404.
///
/// ```rust
/// use vocab_extraction::ingestors::MockFetcher;
///
/// let fetcher = MockFetcher::new().with_page("https://example.com", "# 新聞");
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` (already-converted text) for `url`.
    pub fn with_page(self, url: impl Into<String>, content: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), content.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<SourceDocument> {
        self.calls.write().unwrap().push(url.to_string());
        let content = self.pages.read().unwrap().get(url).cloned();
        match content {
            Some(content) => Ok(SourceDocument::new(
                DocumentOrigin::Url(url.to_string()),
                content,
            )),
            None => Err(FetchError::Http {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
