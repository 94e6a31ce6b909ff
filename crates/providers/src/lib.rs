//! Model endpoint implementations for barrister.
//!
//! Currently one backend: any OpenAI-compatible chat-completions API, with
//! a convenience constructor for Groq (the hosted endpoint the default
//! configuration points at).

pub mod openai_compat;

pub use openai_compat::OpenAiCompatEndpoint;
