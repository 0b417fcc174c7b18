//! Graph dataset and artifact references produced by the renderer.
//!
//! Edges are decorative. They are sampled at random for visual
//! connectivity and say nothing about how the words relate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::vocabulary::VocabularyEntry;
use crate::error::{ExtractionError, Result};

/// A vocabulary entry placed in the graph. `id` is its input position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: usize,
    pub word: String,
    pub translation: String,
    pub definition: String,
    pub example: String,
    pub example_translation: String,
    /// Display code, e.g. `A1` or `Unclassified`
    pub level: String,
    /// Legend colour bucket
    pub group: u8,
}

impl GraphNode {
    pub fn from_entry(id: usize, entry: &VocabularyEntry) -> Self {
        Self {
            id,
            word: entry.surface_form.clone(),
            translation: entry.target_translation.clone(),
            definition: entry.definition.clone(),
            example: entry.example_source.clone(),
            example_translation: entry.example_translation.clone(),
            level: entry.level.code(),
            group: entry.level.group(),
        }
    }
}

/// Random, non-semantic link between two nodes. `value` is in 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub value: u8,
}

/// Rendered output of one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphArtifact {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub artifact: ArtifactId,
}

/// Reference to a rendered HTML page.
///
/// Only names the renderer itself generates are accepted, so a lookup can
/// never address anything outside the artifact directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Generate an id: `<prefix>_graph_<n>words_<YYYYmmdd_HHMMSS>.html`.
    pub fn generate(prefix: &str, word_count: usize, at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}_graph_{}words_{}.html",
            prefix,
            word_count,
            at.format("%Y%m%d_%H%M%S")
        ))
    }

    /// Validate an id received from a client.
    pub fn parse(raw: &str) -> Result<Self> {
        let stem = raw
            .strip_suffix(".html")
            .ok_or_else(|| ExtractionError::validation("artifact id must end in .html"))?;

        let well_formed = !stem.is_empty()
            && stem.contains("_graph_")
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !well_formed {
            return Err(ExtractionError::validation(format!(
                "not an artifact id: {raw}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = ExtractionError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.0
    }
}
