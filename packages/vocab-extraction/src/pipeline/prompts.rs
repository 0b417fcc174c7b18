//! Vocabulary extraction prompts.
//!
//! Each prompt embeds the document and a strict output-format example. The
//! model is not schema-constrained, so the reply is parsed defensively by
//! [`parse_vocabulary_response`](super::extract::parse_vocabulary_response).

use super::profile::LanguageProfile;

/// Chinese text → English glosses.
pub const CHINESE_EXTRACT_PROMPT: &str = r#"請對以下中文內容進行詳細分析：

1. 首先進行分詞，找出所有重要的詞彙（名詞、動詞、形容詞等），忽略無關的標點符號和格式
2. 只提取中文詞彙（2-4個字為主）
3. 對每個詞彙提供以下資訊：
   - 中文詞彙（僅提供詞彙本身，不要包含其他說明）
   - 英文翻譯
   - 英文定義/解釋
   - 中文例句（使用該詞彙的簡單例句）
   - 例句的英文翻譯

請以JSON格式輸出，結構如下：
[
  {
    "chinese": "中文詞彙",
    "english": "English translation",
    "definition": "English definition",
    "example_chinese": "中文例句",
    "example_english": "English translation of the example"
  }
]

中文內容：
{content}"#;

/// Korean text → Chinese glosses.
pub const KOREAN_EXTRACT_PROMPT: &str = r#"請對以下韓文內容進行詳細分析：

1. 首先進行分詞，找出所有重要的詞彙（名詞、動詞、形容詞等），忽略無關的標點符號和格式
2. 只提取韓文詞彙，忽略英文、數字等
3. 對每個詞彙提供以下資訊：
   - 韓文原文
   - 中文翻譯
   - 中文定義/解釋
   - 韓文例句（使用該詞彙的簡單例句）
   - 例句的中文翻譯

請以JSON格式輸出，結構如下：
[
  {
    "korean": "韓文詞彙",
    "chinese": "中文翻譯",
    "definition": "中文定義解釋",
    "example_korean": "韓文例句",
    "example_chinese": "例句中文翻譯"
  }
]

韓文內容：
{content}"#;

/// Fill the profile's template with the document content.
pub fn format_extract_prompt(profile: LanguageProfile, content: &str) -> String {
    profile.prompt_template().replace("{content}", content)
}
