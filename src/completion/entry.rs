//! Completion entry model and LSP conversion

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation as LspDocumentation, InsertTextFormat,
    MarkupContent, MarkupKind,
};

use super::registry::KeywordCategory;
use super::snippet::Snippet;

/// Semantic UI classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Function,
    Keyword,
    TypeParameter,
    Operator,
    Constant,
    File,
    Text,
}

impl EntryKind {
    pub fn to_lsp(self) -> CompletionItemKind {
        match self {
            EntryKind::Function => CompletionItemKind::FUNCTION,
            EntryKind::Keyword => CompletionItemKind::KEYWORD,
            EntryKind::TypeParameter => CompletionItemKind::TYPE_PARAMETER,
            EntryKind::Operator => CompletionItemKind::OPERATOR,
            EntryKind::Constant => CompletionItemKind::CONSTANT,
            EntryKind::File => CompletionItemKind::FILE,
            EntryKind::Text => CompletionItemKind::TEXT,
        }
    }
}

/// What gets inserted when the entry is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertTemplate {
    /// The label itself.
    Plain,
    Snippet(Snippet),
}

impl InsertTemplate {
    pub fn as_snippet(&self) -> Option<&Snippet> {
        match self {
            InsertTemplate::Snippet(snippet) => Some(snippet),
            InsertTemplate::Plain => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Documentation {
    Markdown(String),
    Plain(String),
}

impl Documentation {
    pub fn as_str(&self) -> &str {
        match self {
            Documentation::Markdown(text) | Documentation::Plain(text) => text,
        }
    }

    fn to_lsp(&self) -> LspDocumentation {
        match self {
            Documentation::Markdown(text) => LspDocumentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: text.clone(),
            }),
            Documentation::Plain(text) => LspDocumentation::String(text.clone()),
        }
    }
}

/// A finished completion entry for one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub label: String,
    pub category: KeywordCategory,
    pub kind: EntryKind,
    pub insert: InsertTemplate,
    pub detail: String,
    pub documentation: Documentation,
}

impl CompletionEntry {
    /// The text inserted on acceptance, in LSP snippet syntax for snippet
    /// templates.
    pub fn insert_text(&self) -> String {
        match &self.insert {
            InsertTemplate::Plain => self.label.clone(),
            InsertTemplate::Snippet(snippet) => snippet.render(),
        }
    }

    /// Convert to LSP CompletionItem. `sort_width` is the number of digits
    /// the sort key is zero-padded to.
    pub fn to_completion_item(&self, sort_order: usize, sort_width: usize) -> CompletionItem {
        let insert_text_format = match self.insert {
            InsertTemplate::Plain => InsertTextFormat::PLAIN_TEXT,
            InsertTemplate::Snippet(_) => InsertTextFormat::SNIPPET,
        };

        CompletionItem {
            label: self.label.clone(),
            kind: Some(self.kind.to_lsp()),
            detail: Some(self.detail.clone()),
            documentation: Some(self.documentation.to_lsp()),
            insert_text: Some(self.insert_text()),
            insert_text_format: Some(insert_text_format),
            // Sort text keeps the catalog's lexicographic order
            sort_text: Some(format!("{:0width$}", sort_order, width = sort_width)),
            ..Default::default()
        }
    }
}
