//! Vocabulary entries and the proficiency levels attached to them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for any field the model left out.
pub const MISSING_FIELD: &str = "N/A";

/// One extracted word with its translation and usage example.
///
/// `surface_form` is the dedup key within a single batch only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub surface_form: String,
    pub target_translation: String,
    pub definition: String,
    pub example_source: String,
    pub example_translation: String,
    #[serde(default)]
    pub level: Level,
}

impl VocabularyEntry {
    /// Create an unclassified entry.
    pub fn new(
        surface_form: impl Into<String>,
        target_translation: impl Into<String>,
        definition: impl Into<String>,
        example_source: impl Into<String>,
        example_translation: impl Into<String>,
    ) -> Self {
        Self {
            surface_form: surface_form.into(),
            target_translation: target_translation.into(),
            definition: definition.into(),
            example_source: example_source.into(),
            example_translation: example_translation.into(),
            level: Level::Unclassified,
        }
    }

    /// Set the level tag.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Result of a level lookup. A miss is explicit, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Level {
    Tagged(LevelTag),
    #[default]
    Unclassified,
}

impl Level {
    /// Short display code such as `A1`, or `Unclassified`.
    pub fn code(&self) -> String {
        match self {
            Self::Tagged(tag) => tag.code(),
            Self::Unclassified => "Unclassified".to_string(),
        }
    }

    /// Colour bucket for the graph legend (0-4 for A-E, 5 otherwise).
    pub fn group(&self) -> u8 {
        match self {
            Self::Tagged(tag) => tag.category.group(),
            Self::Unclassified => 5,
        }
    }

    pub fn tag(&self) -> Option<&LevelTag> {
        match self {
            Self::Tagged(tag) => Some(tag),
            Self::Unclassified => None,
        }
    }
}

/// Coarse proficiency classification from the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelTag {
    pub category: LevelCategory,
    pub tier: u8,
}

impl LevelTag {
    pub fn new(category: LevelCategory, tier: u8) -> Self {
        Self { category, tier }
    }

    /// Category letter followed by tier, e.g. `B2`.
    pub fn code(&self) -> String {
        format!("{}{}", self.category.letter(), self.tier)
    }
}

/// Level category buckets. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelCategory {
    Basic,
    Intermediate,
    Advanced,
    Fluent,
    Proficient,
    Other(String),
}

impl LevelCategory {
    /// Parse a category label from the reference table.
    ///
    /// Accepts the TOCFL labels (基礎, 進階, 高階, 流利, 精通) and their
    /// English names.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "基礎" | "Basic" | "basic" => Self::Basic,
            "進階" | "Intermediate" | "intermediate" => Self::Intermediate,
            "高階" | "Advanced" | "advanced" => Self::Advanced,
            "流利" | "Fluent" | "fluent" => Self::Fluent,
            "精通" | "Proficient" | "proficient" => Self::Proficient,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn letter(&self) -> &str {
        match self {
            Self::Basic => "A",
            Self::Intermediate => "B",
            Self::Advanced => "C",
            Self::Fluent => "D",
            Self::Proficient => "E",
            Self::Other(label) => label,
        }
    }

    pub fn group(&self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Fluent => 3,
            Self::Proficient => 4,
            Self::Other(_) => 5,
        }
    }
}

impl fmt::Display for LevelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("Basic"),
            Self::Intermediate => f.write_str("Intermediate"),
            Self::Advanced => f.write_str("Advanced"),
            Self::Fluent => f.write_str("Fluent"),
            Self::Proficient => f.write_str("Proficient"),
            Self::Other(label) => f.write_str(label),
        }
    }
}
