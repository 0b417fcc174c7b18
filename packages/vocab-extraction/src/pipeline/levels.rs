//! Static proficiency-level lookup (TOCFL word list).
//!
//! The table is loaded once and is read-only afterwards, so it can be shared
//! behind an `Arc` without locking.

use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::types::vocabulary::{Level, LevelCategory, LevelTag};

/// One row of the reference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelInfo {
    pub tag: LevelTag,
    pub pinyin: Option<String>,
    pub situation: Option<String>,
}

/// Exact-match word → level table.
#[derive(Debug, Clone, Default)]
pub struct LevelTable {
    entries: HashMap<String, LevelInfo>,
}

impl LevelTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from a comma-separated file.
    ///
    /// A missing or unreadable file yields an empty table; malformed rows
    /// are skipped. Neither stops the process.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let table = Self::parse(&text);
                info!(path = %path.display(), entries = table.len(), "Level table loaded");
                table
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Level table unavailable, classifying nothing");
                Self::empty()
            }
        }
    }

    /// Parse reference-file text.
    ///
    /// With a header row, columns are found by name (`word`; `deng` or
    /// `category`; `ji` or `tier`; optional `pinyin`, `situation`). Without
    /// one, the first three columns are word, category, tier.
    pub fn parse(text: &str) -> Self {
        let text = text.trim_start_matches('\u{feff}');
        let mut lines = text.lines().filter(|l| !l.trim().is_empty()).peekable();

        let columns = match lines.peek().map(|l| split_csv_line(l)) {
            Some(header) if header.iter().any(|h| h == "word") => {
                lines.next();
                Columns::from_header(&header)
            }
            _ => Columns::positional(),
        };

        let mut entries = HashMap::new();
        let mut skipped = 0usize;
        for line in lines {
            let fields = split_csv_line(line);
            match columns.read_row(&fields) {
                Some((words, info)) => {
                    // "爸爸/爸": every written form is its own key
                    for form in words.split('/').map(str::trim).filter(|w| !w.is_empty()) {
                        entries.insert(form.to_string(), info.clone());
                    }
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "Skipped malformed level table rows");
        }
        Self { entries }
    }

    /// Exact, case-sensitive lookup. A miss is `Level::Unclassified`.
    pub fn classify(&self, word: &str) -> Level {
        self.entries
            .get(word)
            .map(|info| Level::Tagged(info.tag.clone()))
            .unwrap_or(Level::Unclassified)
    }

    pub fn info(&self, word: &str) -> Option<&LevelInfo> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct Columns {
    word: usize,
    category: usize,
    tier: usize,
    pinyin: Option<usize>,
    situation: Option<usize>,
}

impl Columns {
    fn positional() -> Self {
        Self {
            word: 0,
            category: 1,
            tier: 2,
            pinyin: None,
            situation: None,
        }
    }

    fn from_header(header: &[String]) -> Self {
        let find = |names: &[&str]| header.iter().position(|h| names.contains(&h.as_str()));
        Self {
            word: find(&["word"]).unwrap_or(0),
            category: find(&["deng", "category"]).unwrap_or(1),
            tier: find(&["ji", "tier"]).unwrap_or(2),
            pinyin: find(&["pinyin"]),
            situation: find(&["situation"]),
        }
    }

    fn read_row(&self, fields: &[String]) -> Option<(String, LevelInfo)> {
        let word = fields.get(self.word)?.trim();
        if word.is_empty() {
            return None;
        }
        let category = fields.get(self.category)?.trim();
        if category.is_empty() {
            return None;
        }
        let tier = parse_tier(fields.get(self.tier)?)?;

        let optional = |idx: Option<usize>| {
            idx.and_then(|i| fields.get(i))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Some((
            word.to_string(),
            LevelInfo {
                tag: LevelTag::new(LevelCategory::parse(category), tier),
                pinyin: optional(self.pinyin),
                situation: optional(self.situation),
            },
        ))
    }
}

/// `第1級`, `1級`, `Level 1` and `1` all parse to 1.
fn parse_tier(raw: &str) -> Option<u8> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Split one CSV line, honouring double-quoted fields and `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields.into_iter().map(|f| f.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_slash_separated_forms_share_a_tag() {
        let table = LevelTable::parse("爸爸/爸,基礎,第1級\n");

        let expected = Level::Tagged(LevelTag::new(LevelCategory::Basic, 1));
        assert_eq!(table.classify("爸爸"), expected);
        assert_eq!(table.classify("爸"), expected);
        assert_eq!(table.classify("媽媽"), Level::Unclassified);
        assert_eq!(table.classify("爸 "), Level::Unclassified);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_named_columns_with_bom() {
        let text = "\u{feff}id,word,pinyin,deng,ji,situation\n\
                    1,圖書館,túshūguǎn,進階,第3級,學校\n\
                    2,\"學生\",xuéshēng,基礎,第1級,\n";
        let table = LevelTable::parse(text);

        let info = table.info("圖書館").unwrap();
        assert_eq!(info.tag, LevelTag::new(LevelCategory::Intermediate, 3));
        assert_eq!(info.tag.code(), "B3");
        assert_eq!(info.pinyin.as_deref(), Some("túshūguǎn"));
        assert_eq!(info.situation.as_deref(), Some("學校"));
        assert_eq!(table.info("學生").unwrap().situation, None);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "word,category,tier\n好,基礎,第1級\n,基礎,第1級\n壞,基礎\n錯,基礎,沒有\n";
        let table = LevelTable::parse(text);

        assert_eq!(table.len(), 1);
        assert!(matches!(table.classify("好"), Level::Tagged(_)));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = LevelTable::parse("word,category,tier\nWiFi,Basic,2\n");
        assert!(matches!(table.classify("WiFi"), Level::Tagged(_)));
        assert_eq!(table.classify("wifi"), Level::Unclassified);
    }

    #[test]
    fn test_missing_file_gives_empty_table() {
        let table = LevelTable::load("/nonexistent/tocfl.csv");
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "word,deng,ji").unwrap();
        writeln!(file, "看書,基礎,第2級").unwrap();

        let table = LevelTable::load(file.path());
        assert_eq!(table.classify("看書").code(), "A2");
    }

    #[test]
    fn test_split_csv_line_handles_quotes() {
        assert_eq!(
            split_csv_line(r#"a,"b,c","say ""hi""""#),
            vec!["a", "b,c", "say \"hi\""]
        );
    }
}
