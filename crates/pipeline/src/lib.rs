//! The barrister pipeline: context assembly, resilient invocation, and the
//! answer/summarize services.
//!
//! Data flow: caller → [`context::build_context`] → [`PromptPayload`] →
//! [`invoke::invoke`] → model endpoint → response text.

pub mod context;
pub mod invoke;
pub mod services;

pub use context::build_context;
pub use invoke::{invoke, RetryPolicy};
pub use services::QaService;

pub use barrister_core::prompt::PromptPayload;
