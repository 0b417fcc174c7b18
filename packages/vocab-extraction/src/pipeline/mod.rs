//! The vocabulary pipeline.
//!
//! - Prompt construction per [`LanguageProfile`]
//! - Tolerant JSON extraction of the model reply
//! - TOCFL level classification
//! - Graph construction and HTML rendering
//! - Job orchestration ([`Pipeline`])

pub mod extract;
pub mod levels;
pub mod profile;
pub mod prompts;
pub mod render;
pub mod runner;

pub use extract::{locate_json_array, parse_vocabulary_response, strip_code_fences};
pub use levels::{LevelInfo, LevelTable};
pub use profile::LanguageProfile;
pub use prompts::{format_extract_prompt, CHINESE_EXTRACT_PROMPT, KOREAN_EXTRACT_PROMPT};
pub use render::{build_edges, build_nodes, render_page};
pub use runner::{progress, Pipeline, DEFAULT_GENERATION_TIMEOUT};
