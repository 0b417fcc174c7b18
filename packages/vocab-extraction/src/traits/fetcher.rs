//! Fetcher trait for URL-mode document retrieval.
//!
//! # SSRF Protection
//!
//! Wrap URL fetchers with [`ValidatedFetcher`] whenever the URL comes from a
//! client:
//!
//! ```rust,ignore
//! let fetcher = ValidatedFetcher::new(HttpFetcher::new()?);
//! let doc = fetcher.fetch("https://example.com").await?;
//! ```

use async_trait::async_trait;

use crate::error::{FetchError, FetchResult};
use crate::security::UrlValidator;
use crate::types::document::SourceDocument;

/// Retrieves a URL and converts it into a capped [`SourceDocument`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`. Non-success statuses and timeouts are errors.
    async fn fetch(&self, url: &str) -> FetchResult<SourceDocument>;

    /// Fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// A fetcher that validates URLs before fetching.
pub struct ValidatedFetcher<F: Fetcher> {
    inner: F,
    validator: UrlValidator,
}

impl<F: Fetcher> ValidatedFetcher<F> {
    /// Wrap with the default security rules.
    pub fn new(fetcher: F) -> Self {
        Self {
            inner: fetcher,
            validator: UrlValidator::new(),
        }
    }

    pub fn with_validator(fetcher: F, validator: UrlValidator) -> Self {
        Self {
            inner: fetcher,
            validator,
        }
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for ValidatedFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult<SourceDocument> {
        self.validator.validate(url).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Blocked URL");
            FetchError::Security(e)
        })?;
        self.inner.fetch(url).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestors::MockFetcher;

    #[tokio::test]
    async fn test_blocked_url_never_reaches_inner_fetcher() {
        let inner = MockFetcher::new().with_page("http://localhost/admin", "secret");
        let fetcher = ValidatedFetcher::new(inner);

        let err = fetcher.fetch("http://localhost/admin").await.unwrap_err();

        assert!(matches!(err, FetchError::Security(_)));
    }

    #[tokio::test]
    async fn test_public_url_is_forwarded() {
        let inner = MockFetcher::new().with_page("https://example.com/", "hello");
        let fetcher = ValidatedFetcher::new(inner);

        let doc = fetcher.fetch("https://example.com/").await.unwrap();

        assert_eq!(doc.content(), "hello");
        assert_eq!(fetcher.name(), "mock");
    }
}
