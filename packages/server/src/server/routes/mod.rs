// HTTP routes
pub mod artifacts;
pub mod health;
pub mod jobs;
pub mod words;

pub use artifacts::*;
pub use health::*;
pub use jobs::*;
pub use words::*;
