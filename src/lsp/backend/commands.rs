//! Workspace command dispatch
//!
//! `pseudocode.build` and `pseudocode.run` take the source file as their
//! first argument, either as a `file://` URI or a plain path. Launches are
//! fire-and-forget: the command returns as soon as the process is queued and
//! the outcome is reported to the client when it finishes.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{MessageType, Url};
use tracing::{debug, error, info};

use super::state::PseudocodeBackend;
use crate::launcher::LaunchRequest;

pub const BUILD_COMMAND: &str = "pseudocode.build";
pub const RUN_COMMAND: &str = "pseudocode.run";
pub const SUPPORTED_COMMANDS: &[&str] = &[BUILD_COMMAND, RUN_COMMAND];

/// Resolves the source file argument of a workspace command.
pub(super) fn source_path(arguments: &[Value]) -> Result<PathBuf, String> {
    let argument = arguments
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| "expected the source file URI or path as the first argument".to_string())?;

    if argument.starts_with("file:") {
        let uri = Url::parse(argument).map_err(|e| format!("invalid file URI {}: {}", argument, e))?;
        uri.to_file_path()
            .map_err(|_| format!("URI does not name a local file: {}", argument))
    } else if argument.is_empty() {
        Err("source file argument is empty".to_string())
    } else {
        Ok(PathBuf::from(argument))
    }
}

/// Builds the launch request for a supported command.
pub(super) fn launch_request(command: &str, arguments: &[Value]) -> jsonrpc::Result<LaunchRequest> {
    let request = match command {
        BUILD_COMMAND => LaunchRequest::build,
        RUN_COMMAND => LaunchRequest::run,
        other => {
            return Err(jsonrpc::Error::invalid_params(format!("unknown command: {}", other)));
        }
    };

    let source = source_path(arguments).map_err(jsonrpc::Error::invalid_params)?;
    Ok(request(&source))
}

impl PseudocodeBackend {
    /// Spawns the launch in the background and reports its outcome to the
    /// client.
    pub(super) fn spawn_launch(&self, request: LaunchRequest) {
        let launcher = Arc::clone(&self.launcher);
        let client = self.client.clone();

        tokio::spawn(async move {
            debug!("Launching {} via {}", request.title, launcher.launcher_name());
            match launcher.launch(&request).await {
                Ok(outcome) => {
                    let mut message = format!("{} finished with {}", request.title, outcome.status);
                    if !outcome.output.trim().is_empty() {
                        message.push('\n');
                        message.push_str(outcome.output.trim_end());
                    }
                    info!("{} finished with {}", request.title, outcome.status);

                    let level = if outcome.status.success() { MessageType::INFO } else { MessageType::WARNING };
                    client.log_message(level, message).await;
                }
                Err(e) => {
                    error!("{} failed: {:#}", request.title, e);
                    client
                        .show_message(MessageType::ERROR, format!("{} failed: {:#}", request.title, e))
                        .await;
                }
            }
        });
    }
}
