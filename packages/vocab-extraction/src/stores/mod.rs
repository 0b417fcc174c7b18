//! Storage implementations.
//!
//! - `MemoryJobStore` / `MemoryWordStore` - process-lifetime maps
//! - `FileArtifactStore` - rendered pages on the local filesystem

mod fs;
mod memory;

pub use fs::FileArtifactStore;
pub use memory::{MemoryJobStore, MemoryWordStore, DEFAULT_USER};
