//! Keyword completion for pseudocode
//!
//! This module provides:
//! - A data-driven keyword registry (category, snippet template, documentation)
//! - Structured snippet templates with ordered tab stops
//! - The completion catalog built from the grammar's keyword set

pub mod catalog;
pub mod entry;
pub mod registry;
pub mod snippet;

pub use catalog::CompletionCatalog;
pub use entry::{CompletionEntry, Documentation, EntryKind, InsertTemplate};
pub use registry::{KeywordCategory, KeywordRegistry, KeywordSpec, classify, registry};
pub use snippet::{Snippet, SnippetError, SnippetPart};
