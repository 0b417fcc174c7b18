//! HTTP fetcher: GET a page and turn it into capped Markdown.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::security::UrlValidator;
use crate::traits::fetcher::Fetcher;
use crate::types::document::{DocumentOrigin, SourceDocument};

/// Desktop browser User-Agent; many news sites refuse obvious bots.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static MULTI_NEWLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Fetches a single URL over HTTP.
///
/// No caching and no disk writes: every call is a fresh GET.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default 20s timeout.
    pub fn new() -> FetchResult<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> FetchResult<Self> {
        Self::with_validator(timeout, UrlValidator::new())
    }

    /// Every redirect target is checked against `validator` before it is followed.
    pub fn with_validator(timeout: Duration, validator: UrlValidator) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .redirect(checked_redirects(validator))
            .build()
            .map_err(|e| FetchError::Request(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_html(&self, url: &str) -> FetchResult<String> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            classify_reqwest_error(url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(url, e))
    }
}

/// Redirect policy that re-runs the SSRF checks on each hop.
pub fn checked_redirects(validator: UrlValidator) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        match validator.validate(attempt.url().as_str()) {
            Ok(()) => attempt.follow(),
            Err(e) => {
                warn!(target_url = %attempt.url(), error = %e, "Blocked redirect");
                attempt.error(e)
            }
        }
    })
}

fn classify_reqwest_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request(Box::new(error))
    }
}

/// Drop `<script>` and `<style>` subtrees so code and CSS never reach the prompt.
pub fn strip_scripts_and_styles(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    STYLE_RE.replace_all(&without_scripts, "").into_owned()
}

/// Convert HTML into heading-aware Markdown.
pub fn html_to_markdown(html: &str) -> String {
    let cleaned = strip_scripts_and_styles(html);
    let markdown = htmd::convert(&cleaned).unwrap_or_else(|_| {
        // Fallback: strip tags and keep the text
        TAG_RE.replace_all(&cleaned, "").into_owned()
    });
    MULTI_NEWLINE_RE
        .replace_all(markdown.trim(), "\n\n")
        .into_owned()
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<SourceDocument> {
        debug!(url = %url, "HTTP fetch starting");
        let html = self.fetch_html(url).await?;
        let markdown = html_to_markdown(&html);
        let doc = SourceDocument::new(DocumentOrigin::Url(url.to_string()), markdown);

        debug!(
            url = %url,
            html_bytes = html.len(),
            chars = doc.char_len(),
            truncated = doc.truncated(),
            "Page fetched"
        );
        Ok(doc)
    }

    fn name(&self) -> &str {
        "http"
    }
}
