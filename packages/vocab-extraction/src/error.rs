//! Typed errors for the vocabulary extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the server can map
//! each failure class onto a job status or an HTTP response.

use thiserror::Error;

/// Errors that can occur anywhere in the extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Retrieving the source document failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The remote text-generation call failed (auth, quota, network)
    #[error("generation failed: {message}")]
    Generation { message: String },

    /// Model output did not contain a parseable JSON array
    #[error("malformed extraction: {reason}")]
    MalformedExtraction { reason: String },

    /// Unknown job id or artifact reference
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Submission was missing required fields
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// Graph page could not be serialized
    #[error("render error: {0}")]
    Render(#[from] serde_json::Error),

    /// Store backend failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Filesystem error while writing or reading artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedExtraction {
            reason: reason.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while fetching a source document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// URL failed SSRF validation
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Request exceeded the fetch timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Transport-level failure
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Security-related errors for URL-mode fetching (SSRF protection).
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, metadata endpoints)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
