//! Completion catalog
//!
//! Combines the keywords extracted from the grammar with the registry into
//! the immutable list served to the editor. The catalog is built once per
//! session.

use std::path::Path;

use tower_lsp::lsp_types::{CompletionItem, Position};
use tracing::{debug, info};

use crate::grammar::{GrammarDocument, GrammarLoadError, RawKeyword, extract_keywords, load_grammar};

use super::entry::CompletionEntry;
use super::registry::{KeywordCategory, classify};

/// Sorted, label-unique list of completion entries.
#[derive(Debug, Clone, Default)]
pub struct CompletionCatalog {
    entries: Vec<CompletionEntry>,
}

impl CompletionCatalog {
    /// Builds the catalog from extracted keywords. Duplicates are collapsed
    /// and entries are ordered by label.
    pub fn build(keywords: impl IntoIterator<Item = RawKeyword>) -> Self {
        let mut keywords: Vec<RawKeyword> = keywords.into_iter().collect();
        keywords.sort();
        keywords.dedup();

        let entries: Vec<CompletionEntry> = keywords
            .into_iter()
            .map(|keyword| {
                let spec = classify(&keyword);
                CompletionEntry {
                    label: keyword.into_string(),
                    category: spec.category,
                    kind: spec.kind,
                    insert: spec.insert,
                    detail: spec.detail,
                    documentation: spec.documentation,
                }
            })
            .collect();

        let generic = entries
            .iter()
            .filter(|entry| entry.category == KeywordCategory::Generic)
            .count();
        debug!(
            "Built completion catalog: {} entries ({} without a bespoke template)",
            entries.len(),
            generic
        );

        Self { entries }
    }

    pub fn from_grammar(document: &GrammarDocument) -> Self {
        Self::build(extract_keywords(document))
    }

    /// Loads the grammar at `path` and builds the catalog from it. Fails
    /// without a partial catalog if the grammar cannot be loaded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GrammarLoadError> {
        let path = path.as_ref();
        let document = load_grammar(path)?;
        let catalog = Self::from_grammar(&document);
        info!("Loaded {} pseudocode keywords from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Entries applicable at `position`. The pseudocode grammar is flat, so
    /// every keyword is a candidate everywhere; prefix filtering is left to
    /// the editor.
    pub fn completions_at(&self, _position: Position) -> &[CompletionEntry] {
        &self.entries
    }

    pub fn entries(&self) -> &[CompletionEntry] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<&CompletionEntry> {
        self.entries
            .binary_search_by(|entry| entry.label.as_str().cmp(label))
            .ok()
            .map(|index| &self.entries[index])
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_completion_items(&self, position: Position) -> Vec<CompletionItem> {
        let entries = self.completions_at(position);
        let width = sort_key_width(entries.len());
        entries
            .iter()
            .enumerate()
            .map(|(order, entry)| entry.to_completion_item(order, width))
            .collect()
    }
}

/// Digits needed so zero-padded sort keys compare in catalog order, at
/// least four.
fn sort_key_width(len: usize) -> usize {
    let last = len.saturating_sub(1);
    last.checked_ilog10().map_or(1, |digits| digits as usize + 1).max(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::entry::{EntryKind, InsertTemplate};
    use crate::grammar::parse_grammar;
    use indoc::indoc;
    use tower_lsp::lsp_types::{CompletionItemKind, Documentation, InsertTextFormat};

    fn keywords(words: &[&str]) -> Vec<RawKeyword> {
        words.iter().filter_map(|w| RawKeyword::new(*w)).collect()
    }

    #[test]
    fn test_build_sorts_and_dedups() {
        let catalog = CompletionCatalog::build(keywords(&["WHILE", "IF", "WHILE", "ELSE"]));
        let labels: Vec<&str> = catalog.labels().collect();
        assert_eq!(labels, vec!["ELSE", "IF", "WHILE"]);
    }

    #[test]
    fn test_if_else_endif_scenario() {
        let document = parse_grammar(indoc! {r#"
            { "repository": { "keywords": { "patterns": [ { "match": "\\b(IF|ELSE|ENDIF)\\b" } ] } } }
        "#})
        .unwrap();
        let catalog = CompletionCatalog::from_grammar(&document);
        let labels: Vec<&str> = catalog.labels().collect();
        assert_eq!(labels, vec!["ELSE", "ENDIF", "IF"]);

        let if_snippet = catalog.get("IF").unwrap().insert.as_snippet().unwrap();
        assert!(if_snippet.preview().starts_with("IF condition THEN"));
        assert!(if_snippet.has_final_stop());
        assert_eq!(if_snippet.text_after_final_stop().as_deref(), Some("ENDIF"));

        let else_snippet = catalog.get("ELSE").unwrap().insert.as_snippet().unwrap();
        assert!(else_snippet.has_final_stop());
        assert!(else_snippet.text_after_final_stop().is_none());

        let endif = catalog.get("ENDIF").unwrap();
        assert_eq!(endif.category, KeywordCategory::Generic);
        assert_eq!(endif.insert, InsertTemplate::Plain);
    }

    #[test]
    fn test_completions_ignore_position() {
        let catalog = CompletionCatalog::build(keywords(&["OUTPUT", "INPUT"]));
        let at_start = catalog.completions_at(Position::new(0, 0)).len();
        let elsewhere = catalog.completions_at(Position::new(42, 7)).len();
        assert_eq!(at_start, 2);
        assert_eq!(elsewhere, 2);
    }

    #[test]
    fn test_get_missing_label() {
        let catalog = CompletionCatalog::build(keywords(&["IF"]));
        assert!(catalog.get("ELSE").is_none());
        assert!(CompletionCatalog::default().is_empty());
    }

    #[test]
    fn test_completion_items_for_snippet_and_plain_entries() {
        let catalog = CompletionCatalog::build(keywords(&["IF", "TRUE"]));
        let items = catalog.to_completion_items(Position::new(0, 0));
        assert_eq!(items.len(), 2);

        let if_item = &items[0];
        assert_eq!(if_item.label, "IF");
        assert_eq!(if_item.kind, Some(CompletionItemKind::KEYWORD));
        assert_eq!(if_item.insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert_eq!(if_item.insert_text.as_deref(), Some("IF ${1:condition} THEN\n\t$0\nENDIF"));
        assert!(matches!(if_item.documentation, Some(Documentation::MarkupContent(_))));
        assert_eq!(if_item.sort_text.as_deref(), Some("0000"));

        let true_item = &items[1];
        assert_eq!(true_item.kind, Some(CompletionItemKind::CONSTANT));
        assert_eq!(true_item.insert_text_format, Some(InsertTextFormat::PLAIN_TEXT));
        assert_eq!(true_item.insert_text.as_deref(), Some("TRUE"));
        assert!(matches!(true_item.documentation, Some(Documentation::String(_))));
        assert_eq!(true_item.sort_text.as_deref(), Some("0001"));
    }

    #[test]
    fn test_sort_text_follows_catalog_order_past_four_digits() {
        assert_eq!(sort_key_width(0), 4);
        assert_eq!(sort_key_width(10_000), 4);
        assert_eq!(sort_key_width(10_001), 5);

        let words: Vec<String> = (0..10_050).map(|i| format!("K{:05}", i)).collect();
        let catalog = CompletionCatalog::build(words.iter().filter_map(|w| RawKeyword::new(w.as_str())));
        let items = catalog.to_completion_items(Position::new(0, 0));
        assert_eq!(items.len(), 10_050);
        assert_eq!(items[9_999].sort_text.as_deref(), Some("09999"));
        assert_eq!(items[10_000].sort_text.as_deref(), Some("10000"));
        assert!(
            items
                .windows(2)
                .all(|pair| pair[0].sort_text < pair[1].sort_text && pair[0].label < pair[1].label)
        );
    }

    #[test]
    fn test_entry_kinds_map_to_lsp() {
        let catalog = CompletionCatalog::build(keywords(&["FUNCTION", "OPENFILE", "INTEGER", "NOT"]));
        let kinds: Vec<EntryKind> = catalog.entries().iter().map(|entry| entry.kind).collect();
        assert_eq!(
            kinds,
            vec![EntryKind::Function, EntryKind::TypeParameter, EntryKind::Operator, EntryKind::File]
        );
    }
}
