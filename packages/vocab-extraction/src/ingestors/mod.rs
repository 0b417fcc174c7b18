//! Fetcher implementations.
//!
//! - `HttpFetcher` - GET + HTML-to-Markdown conversion
//! - `MockFetcher` - canned pages for tests

mod http;
mod mock;

pub use http::{
    checked_redirects, html_to_markdown, strip_scripts_and_styles, HttpFetcher,
    BROWSER_USER_AGENT, DEFAULT_FETCH_TIMEOUT, MAX_REDIRECTS,
};
pub use mock::MockFetcher;

// Re-export from traits for convenience
pub use crate::traits::fetcher::{Fetcher, ValidatedFetcher};
