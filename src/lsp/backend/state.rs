//! Backend state management
//!
//! This module defines the PseudocodeBackend struct, which holds the
//! completion session and the collaborators used by workspace commands.

use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::Client;

use crate::config::ServerConfig;
use crate::launcher::ProcessLauncher;
use crate::lsp::session::CompletionSession;

/// The pseudocode language server backend.
#[derive(Clone)]
pub struct PseudocodeBackend {
    pub(super) client: Client,
    pub(super) config: Arc<ServerConfig>,
    /// `None` before `initialize` and after `shutdown`
    pub(super) session: Arc<RwLock<Option<CompletionSession>>>,
    /// Runs the external compiler and interpreter for workspace commands
    pub(super) launcher: Arc<dyn ProcessLauncher>,
}

// Manual Debug implementation since ProcessLauncher doesn't implement Debug
impl std::fmt::Debug for PseudocodeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PseudocodeBackend")
            .field("config", &self.config)
            .field("launcher", &self.launcher.launcher_name())
            .finish()
    }
}
