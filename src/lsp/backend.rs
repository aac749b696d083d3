use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::Client;
use tracing::info;

use crate::config::ServerConfig;
use crate::launcher::ProcessLauncher;

mod commands;
mod handlers;
mod state;

pub use commands::{BUILD_COMMAND, RUN_COMMAND, SUPPORTED_COMMANDS};
pub use state::PseudocodeBackend;

impl PseudocodeBackend {
    /// Creates the backend. No grammar is read here; the completion session
    /// is activated by `initialize`, once the client's options are known.
    pub fn new(client: Client, config: ServerConfig, launcher: Arc<dyn ProcessLauncher>) -> Self {
        info!(
            "Creating pseudocode backend (extension path {:?}, launcher {})",
            config.extension_path,
            launcher.launcher_name()
        );

        Self {
            client,
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
            launcher,
        }
    }
}
