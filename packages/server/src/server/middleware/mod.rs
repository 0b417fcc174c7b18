// HTTP middleware
pub mod user;

pub use user::*;
