//! CLI command implementations.

pub mod ask;
pub mod chat;
pub mod onboard;
pub mod summarize;

mod setup;
