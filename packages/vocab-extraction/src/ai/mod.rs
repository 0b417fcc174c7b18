//! Generator implementations.
//!
//! Reference clients for the [`Generator`](crate::traits::generator::Generator)
//! trait. Tests use [`MockGenerator`](crate::testing::MockGenerator) instead.

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{Gemini, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
