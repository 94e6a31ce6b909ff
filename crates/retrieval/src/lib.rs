//! File-backed fragment retrieval.
//!
//! A local stand-in for the external vector store: splits a document file
//! into paragraph fragments and ranks them by keyword relevance. The
//! embedding/vector backend proper stays behind the [`FragmentSource`]
//! trait and out of this crate's scope.

pub mod file_source;

pub use file_source::FileFragmentSource;

pub use barrister_core::fragment::FragmentSource;
