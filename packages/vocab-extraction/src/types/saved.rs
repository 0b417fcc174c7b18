//! Records kept in a user's saved-word collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vocabulary::{Level, VocabularyEntry};

/// A word a user bookmarked from a graph page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWord {
    /// Literal surface form; the dedup key per user
    pub word: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub example_translation: String,
    #[serde(default = "unclassified")]
    pub level: String,
    #[serde(default = "unclassified")]
    pub level_category: String,
    #[serde(default)]
    pub level_number: String,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

fn unclassified() -> String {
    Level::Unclassified.code()
}

impl From<&VocabularyEntry> for SavedWord {
    fn from(entry: &VocabularyEntry) -> Self {
        let (level_category, level_number) = match entry.level.tag() {
            Some(tag) => (tag.category.letter().to_string(), tag.tier.to_string()),
            None => (unclassified(), String::new()),
        };
        Self {
            word: entry.surface_form.clone(),
            translation: entry.target_translation.clone(),
            definition: entry.definition.clone(),
            example: entry.example_source.clone(),
            example_translation: entry.example_translation.clone(),
            level: entry.level.code(),
            level_category,
            level_number,
            saved_at: Utc::now(),
        }
    }
}

/// Result of a save attempt. `exists` is true when nothing was inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub exists: bool,
    pub message: String,
}

impl SaveOutcome {
    pub fn inserted() -> Self {
        Self {
            exists: false,
            message: "Word saved".to_string(),
        }
    }

    pub fn already_saved() -> Self {
        Self {
            exists: true,
            message: "Word is already saved".to_string(),
        }
    }
}
