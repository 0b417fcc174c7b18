//! Domain types shared by the pipeline, the stores, and the server.

pub mod document;
pub mod graph;
pub mod job;
pub mod request;
pub mod saved;
pub mod vocabulary;
