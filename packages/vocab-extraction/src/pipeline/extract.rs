//! Tolerant parsing of the model's vocabulary reply.
//!
//! The reply may carry prose or code fences around the array. We strip
//! fences, take everything from the first `[` to the last `]`, and
//! deserialize that into typed rows. Any failure discards the whole batch.
//!
//! Known limitation: the bracket scan is not a JSON-in-text parser. A stray
//! `]` in trailing prose, or unbalanced brackets inside string values, will
//! make the slice invalid and the batch fails.

use serde::Deserialize;

use super::profile::LanguageProfile;
use crate::error::{ExtractionError, Result};
use crate::types::vocabulary::{VocabularyEntry, MISSING_FIELD};

/// Remove Markdown code-fence markers (```` ``` ```` and ```` ```json ````).
///
/// Only the markers and an info-string word directly after an opening
/// fence are dropped. Text sharing a line with a fence is kept.
pub fn strip_code_fences(response: &str) -> String {
    let mut cleaned = String::with_capacity(response.len());
    let mut rest = response;
    while let Some(at) = rest.find("```") {
        cleaned.push_str(&rest[..at]);
        let after = &rest[at + 3..];
        let tag_len = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        rest = &after[tag_len..];
    }
    cleaned.push_str(rest);
    cleaned
}

/// Slice from the first `[` to the last `]`, inclusive.
pub fn locate_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a raw model reply into vocabulary entries for `profile`.
///
/// Missing or null fields become [`MISSING_FIELD`]; non-object array items
/// or invalid JSON fail with `MalformedExtraction`.
pub fn parse_vocabulary_response(
    response: &str,
    profile: LanguageProfile,
) -> Result<Vec<VocabularyEntry>> {
    let cleaned = strip_code_fences(response.trim());
    let array = locate_json_array(&cleaned)
        .ok_or_else(|| ExtractionError::malformed("no JSON array found in model output"))?;

    let parse_err = |e: serde_json::Error| ExtractionError::malformed(e.to_string());
    let entries = match profile {
        LanguageProfile::Chinese => serde_json::from_str::<Vec<ChineseRow>>(array)
            .map_err(parse_err)?
            .into_iter()
            .map(VocabularyEntry::from)
            .collect(),
        LanguageProfile::Korean => serde_json::from_str::<Vec<KoreanRow>>(array)
            .map_err(parse_err)?
            .into_iter()
            .map(VocabularyEntry::from)
            .collect(),
    };
    Ok(entries)
}

fn or_missing(field: Option<String>) -> String {
    field.unwrap_or_else(|| MISSING_FIELD.to_string())
}

/// Row shape requested by the Chinese prompt.
#[derive(Debug, Deserialize)]
struct ChineseRow {
    #[serde(default, alias = "word")]
    chinese: Option<String>,
    #[serde(default, alias = "translation")]
    english: Option<String>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    example_chinese: Option<String>,
    #[serde(default)]
    example_english: Option<String>,
}

impl From<ChineseRow> for VocabularyEntry {
    fn from(row: ChineseRow) -> Self {
        VocabularyEntry::new(
            or_missing(row.chinese),
            or_missing(row.english),
            or_missing(row.definition),
            or_missing(row.example_chinese),
            or_missing(row.example_english),
        )
    }
}

/// Row shape requested by the Korean prompt.
#[derive(Debug, Deserialize)]
struct KoreanRow {
    #[serde(default, alias = "word")]
    korean: Option<String>,
    #[serde(default, alias = "translation")]
    chinese: Option<String>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    example_korean: Option<String>,
    #[serde(default)]
    example_chinese: Option<String>,
}

impl From<KoreanRow> for VocabularyEntry {
    fn from(row: KoreanRow) -> Self {
        VocabularyEntry::new(
            or_missing(row.korean),
            or_missing(row.chinese),
            or_missing(row.definition),
            or_missing(row.example_korean),
            or_missing(row.example_chinese),
        )
    }
}
