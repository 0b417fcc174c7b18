//! Core trait abstractions for the extraction library.
//!
//! These traits define the seams the server fills in: document fetching,
//! text generation, and storage.

pub mod fetcher;
pub mod generator;
pub mod store;
