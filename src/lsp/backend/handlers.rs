//! LSP protocol handler implementations
//!
//! This module contains the `tower_lsp::LanguageServer` implementation for
//! the pseudocode backend:
//! - Lifecycle handlers (initialize, initialized, shutdown)
//! - Completion (the full keyword catalog)
//! - Workspace commands (build, run)

use serde_json::Value;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::{
    CompletionOptions, CompletionParams, CompletionResponse, ExecuteCommandOptions,
    ExecuteCommandParams, InitializeParams, InitializeResult, InitializedParams, MessageType,
    ServerCapabilities, ServerInfo,
};
use tower_lsp::{LanguageServer, jsonrpc};
use tracing::{debug, info, warn};

use super::commands::{SUPPORTED_COMMANDS, launch_request};
use super::state::PseudocodeBackend;
use crate::config::InitializationOptions;
use crate::lsp::session::CompletionSession;

#[tower_lsp::async_trait]
impl LanguageServer for PseudocodeBackend {
    /// Activates the completion session and advertises capabilities.
    async fn initialize(&self, params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        debug!("Received initialize: {:?}", params);

        let options = InitializationOptions::from_value(params.initialization_options);
        let grammar_path = self.config.grammar_path(&options);
        info!("Activating completion session with grammar {:?}", grammar_path);

        let session = CompletionSession::activate(grammar_path);
        {
            let mut guard = self.session.write().await;
            if guard.is_some() {
                warn!("initialize received twice; replacing the previous completion session");
            }
            *guard = Some(session);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: SUPPORTED_COMMANDS.iter().map(|c| c.to_string()).collect(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    /// Reports the activation outcome once.
    async fn initialized(&self, _: InitializedParams) {
        let report = {
            let guard = self.session.read().await;
            guard.as_ref().map(|session| match (session.catalog(), session.load_error()) {
                (Some(catalog), _) => Ok(format!("Pseudocode completion ready: {} keywords", catalog.len())),
                (None, Some(e)) => Err(format!("Pseudocode completion unavailable: {}", e)),
                (None, None) => Err("Pseudocode completion unavailable".to_string()),
            })
        };

        match report {
            Some(Ok(message)) => self.client.log_message(MessageType::INFO, message).await,
            Some(Err(message)) => self.client.show_message(MessageType::ERROR, message).await,
            None => warn!("initialized received without an active session"),
        }
    }

    /// Tears down the completion session.
    async fn shutdown(&self) -> LspResult<()> {
        if let Some(session) = self.session.write().await.take() {
            info!("Completion session for {:?} closed", session.grammar_path());
        }
        Ok(())
    }

    async fn completion(&self, params: CompletionParams) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        debug!("Completion request at {}:{:?}", uri, position);

        let catalog = {
            let guard = self.session.read().await;
            guard.as_ref().and_then(CompletionSession::catalog)
        };

        let Some(catalog) = catalog else {
            debug!("No completion catalog for this session");
            return Ok(None);
        };

        let items = catalog.to_completion_items(position);
        debug!("Returning {} completion items", items.len());
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> LspResult<Option<Value>> {
        debug!("Execute command {} with {:?}", params.command, params.arguments);

        let request = launch_request(&params.command, &params.arguments)?;
        self.spawn_launch(request);
        Ok(None)
    }
}
