//! Language profiles: the per-language knobs of the one generic pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::prompts::{CHINESE_EXTRACT_PROMPT, KOREAN_EXTRACT_PROMPT};
use crate::error::ExtractionError;

/// Which language the submitted document is in.
///
/// A profile picks the prompt template, the JSON field names the model is
/// asked to produce, whether the level classifier runs, and the page labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageProfile {
    /// Chinese source text, English glosses, TOCFL levels
    #[default]
    Chinese,
    /// Korean source text, Chinese glosses, no level table
    Korean,
}

impl LanguageProfile {
    pub fn slug(self) -> &'static str {
        match self {
            Self::Chinese => "chinese",
            Self::Korean => "korean",
        }
    }

    pub fn prompt_template(self) -> &'static str {
        match self {
            Self::Chinese => CHINESE_EXTRACT_PROMPT,
            Self::Korean => KOREAN_EXTRACT_PROMPT,
        }
    }

    /// Only the Chinese profile has a reference level table.
    pub fn uses_level_classifier(self) -> bool {
        matches!(self, Self::Chinese)
    }

    pub fn page_title(self) -> &'static str {
        match self {
            Self::Chinese => "中文詞彙知識圖譜",
            Self::Korean => "韓文詞彙知識圖譜",
        }
    }

    /// `lang` attribute of the rendered page.
    pub fn html_lang(self) -> &'static str {
        "zh-TW"
    }

    /// Label for the translation line in node tooltips.
    pub fn translation_label(self) -> &'static str {
        match self {
            Self::Chinese => "English",
            Self::Korean => "中文",
        }
    }
}

impl fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for LanguageProfile {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chinese" | "zh" | "zh-tw" => Ok(Self::Chinese),
            "korean" | "ko" => Ok(Self::Korean),
            other => Err(ExtractionError::validation(format!(
                "unsupported language: {other}"
            ))),
        }
    }
}
