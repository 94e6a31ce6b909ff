//! Core domain types and traits for barrister.
//!
//! This crate defines the vocabulary shared by every other crate:
//! document fragments, prompt payloads, model responses, the collaborator
//! traits for the model endpoint and the retrieval backend, and the error
//! taxonomy. It has no I/O of its own.

pub mod error;
pub mod fragment;
pub mod model;
pub mod prompt;

pub use error::{Error, ModelError, ReportError, Result, RetrievalError};
pub use fragment::{DocumentFragment, FragmentSource};
pub use model::{ModelEndpoint, ModelResponse, ResponseMessage, Usage};
pub use prompt::{PromptKind, PromptPayload};
