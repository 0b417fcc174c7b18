//! Job submissions as received from clients, and their validated form.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};
use crate::pipeline::LanguageProfile;
use crate::security::{normalize_url, SecretString};

/// How the submission supplies its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    #[default]
    Url,
    Text,
}

/// Raw submission body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSubmission {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub mode: SourceMode,
    #[serde(default)]
    pub language: LanguageProfile,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// The document a job will process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    Url(String),
    Text(String),
}

/// A validated submission, ready to be queued.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub source: JobSource,
    pub profile: LanguageProfile,
    /// Per-request credential; falls back to the pipeline default
    pub credential: Option<SecretString>,
}

impl JobRequest {
    pub fn text(text: impl Into<String>, profile: LanguageProfile) -> Self {
        Self {
            source: JobSource::Text(text.into()),
            profile,
            credential: None,
        }
    }

    pub fn url(url: impl Into<String>, profile: LanguageProfile) -> Self {
        Self {
            source: JobSource::Url(url.into()),
            profile,
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<SecretString>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}

impl TryFrom<JobSubmission> for JobRequest {
    type Error = ExtractionError;

    fn try_from(submission: JobSubmission) -> Result<Self> {
        let non_blank = |field: Option<String>| field.filter(|s| !s.trim().is_empty());

        let source = match submission.mode {
            SourceMode::Url => {
                let url = non_blank(submission.url)
                    .ok_or_else(|| ExtractionError::validation("url is required in url mode"))?;
                JobSource::Url(normalize_url(url.trim()))
            }
            SourceMode::Text => {
                let text = non_blank(submission.text)
                    .ok_or_else(|| ExtractionError::validation("text is required in text mode"))?;
                JobSource::Text(text)
            }
        };

        Ok(Self {
            source,
            profile: submission.language,
            credential: non_blank(submission.api_key).map(SecretString::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(json: &str) -> JobSubmission {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_url_mode_normalizes_scheme() {
        let request =
            JobRequest::try_from(submission(r#"{"url":"example.com/news","mode":"url"}"#)).unwrap();
        assert_eq!(request.source, JobSource::Url("https://example.com/news".into()));
        assert_eq!(request.profile, LanguageProfile::Chinese);
        assert!(request.credential.is_none());
    }

    #[test]
    fn test_text_mode_requires_text() {
        let err = JobRequest::try_from(submission(r#"{"mode":"text","text":"   "}"#)).unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));

        let err = JobRequest::try_from(submission(r#"{"mode":"url"}"#)).unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));
    }

    #[test]
    fn test_language_and_key_are_carried() {
        let request = JobRequest::try_from(submission(
            r#"{"mode":"text","text":"학생","language":"korean","api_key":"k-123"}"#,
        ))
        .unwrap();
        assert_eq!(request.profile, LanguageProfile::Korean);
        assert_eq!(request.credential.unwrap().expose(), "k-123");
    }
}
