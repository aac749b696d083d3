//! Grammar file loading
//!
//! Only the parts of a TextMate grammar that carry keyword information are
//! modelled: the `repository` mapping of named pattern groups, each holding an
//! ordered list of rules with an optional `match` expression. Every other
//! field in the file is ignored by serde.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Deserialized token grammar, keyed by pattern-group name.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GrammarDocument {
    #[serde(default)]
    pub repository: BTreeMap<String, PatternGroup>,
}

/// A named group of pattern rules (one `repository` entry).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PatternGroup {
    #[serde(default)]
    pub patterns: Vec<PatternRule>,
}

/// A single rule. Rules without `match` (e.g. `begin`/`end` pairs or
/// `include`s) are kept but contribute no keywords.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PatternRule {
    #[serde(rename = "match", default)]
    pub match_expr: Option<String>,
}

impl GrammarDocument {
    /// Iterates over every `match` expression, group by group, in rule order.
    pub fn match_expressions(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.repository.iter().flat_map(|(group, patterns)| {
            patterns
                .patterns
                .iter()
                .filter_map(move |rule| rule.match_expr.as_deref().map(|expr| (group.as_str(), expr)))
        })
    }

    /// Total number of rules across all groups.
    pub fn rule_count(&self) -> usize {
        self.repository.values().map(|group| group.patterns.len()).sum()
    }
}

/// Failure to produce a [`GrammarDocument`]. Loading is all-or-nothing.
#[derive(Debug, Error)]
pub enum GrammarLoadError {
    #[error("failed to read grammar file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed grammar file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl GrammarLoadError {
    pub fn path(&self) -> &Path {
        match self {
            GrammarLoadError::Read { path, .. } | GrammarLoadError::Parse { path, .. } => path,
        }
    }
}

/// Reads and deserializes the grammar at `path`.
pub fn load_grammar(path: impl AsRef<Path>) -> Result<GrammarDocument, GrammarLoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| GrammarLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_grammar(&text).map_err(|source| GrammarLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Loaded grammar {:?}: {} pattern groups, {} rules",
        path,
        document.repository.len(),
        document.rule_count()
    );
    Ok(document)
}

/// Deserializes grammar text already in memory.
pub fn parse_grammar(text: &str) -> Result<GrammarDocument, serde_json::Error> {
    serde_json::from_str(text)
}
