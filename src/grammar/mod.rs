//! TextMate grammar handling
//!
//! This module reads the pseudocode token grammar and mines it for the
//! keyword vocabulary:
//! - `loader`: deserializes the grammar file into a [`GrammarDocument`]
//! - `extractor`: recognizes boundary-anchored alternation rules and pulls out
//!   their literal tokens as [`RawKeyword`]s

pub mod extractor;
pub mod loader;

pub use extractor::{RawKeyword, extract_keywords, parse_alternations};
pub use loader::{GrammarDocument, GrammarLoadError, PatternGroup, PatternRule, load_grammar, parse_grammar};
