//! Completion session lifecycle
//!
//! A [`CompletionSession`] is created when the client initializes the server
//! and dropped on shutdown. Catalog construction happens exactly once, at
//! activation; a grammar that fails to load leaves the session without a
//! catalog for its whole lifetime instead of being retried per request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::completion::CompletionCatalog;
use crate::grammar::GrammarLoadError;

#[derive(Debug)]
enum CatalogState {
    Ready(Arc<CompletionCatalog>),
    Unavailable(GrammarLoadError),
}

#[derive(Debug)]
pub struct CompletionSession {
    grammar_path: PathBuf,
    state: CatalogState,
}

impl CompletionSession {
    /// Loads the grammar and builds the catalog.
    pub fn activate(grammar_path: impl Into<PathBuf>) -> Self {
        let grammar_path = grammar_path.into();
        let state = match CompletionCatalog::load(&grammar_path) {
            Ok(catalog) => {
                info!("Completion session active with {} keywords", catalog.len());
                CatalogState::Ready(Arc::new(catalog))
            }
            Err(e) => {
                error!("Completion disabled for this session: {}", e);
                CatalogState::Unavailable(e)
            }
        };

        Self { grammar_path, state }
    }

    /// Wraps an already built catalog.
    pub fn with_catalog(grammar_path: impl Into<PathBuf>, catalog: CompletionCatalog) -> Self {
        Self {
            grammar_path: grammar_path.into(),
            state: CatalogState::Ready(Arc::new(catalog)),
        }
    }

    pub fn grammar_path(&self) -> &Path {
        &self.grammar_path
    }

    /// The catalog, or `None` when activation failed.
    pub fn catalog(&self) -> Option<Arc<CompletionCatalog>> {
        match &self.state {
            CatalogState::Ready(catalog) => Some(Arc::clone(catalog)),
            CatalogState::Unavailable(_) => None,
        }
    }

    pub fn load_error(&self) -> Option<&GrammarLoadError> {
        match &self.state {
            CatalogState::Ready(_) => None,
            CatalogState::Unavailable(e) => Some(e),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, CatalogState::Ready(_))
    }
}
