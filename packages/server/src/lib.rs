// Lexigraph - API server
//
// Exposes the vocabulary pipeline over HTTP: job submission and polling,
// rendered graph pages, and per-user saved words.

pub mod config;
pub mod server;

pub use config::*;
