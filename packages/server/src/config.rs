use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use vocab_extraction::ai::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Server-side default; requests may bring their own key
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub generation_timeout: Duration,
    pub fetch_timeout: Duration,
    pub level_table_path: PathBuf,
    pub artifact_dir: PathBuf,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            generation_timeout: Duration::from_secs(120),
            fetch_timeout: Duration::from_secs(20),
            level_table_path: PathBuf::from("data/tocfl_words.csv"),
            artifact_dir: PathBuf::from("artifacts"),
            allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secs = |key: &str, default: Duration| -> Result<Duration> {
            match var(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{key} must be a whole number of seconds")),
                None => Ok(default),
            }
        };

        Ok(Self {
            port: match var("PORT") {
                Some(raw) => raw.trim().parse().context("PORT must be a valid number")?,
                None => defaults.port,
            },
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            generation_timeout: secs("GENERATION_TIMEOUT_SECS", defaults.generation_timeout)?,
            fetch_timeout: secs("FETCH_TIMEOUT_SECS", defaults.fetch_timeout)?,
            level_table_path: var("LEVEL_TABLE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.level_table_path),
            artifact_dir: var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.generation_timeout, Duration::from_secs(120));
        assert!(config.gemini_api_key.is_none());
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("GEMINI_API_KEY", "abc"),
            ("FETCH_TIMEOUT_SECS", "10"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let err = Config::from_lookup(lookup(&[("GENERATION_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("GENERATION_TIMEOUT_SECS"));
    }
}
