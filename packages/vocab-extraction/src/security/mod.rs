//! Credential handling and SSRF protection.

mod credentials;
mod ssrf;

pub use credentials::SecretString;
pub use ssrf::{normalize_url, UrlValidator};
