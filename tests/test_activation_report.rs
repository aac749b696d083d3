//! Activation reporting through the LSP transport
//!
//! These tests drive `LspService` through its request router rather than
//! calling the backend directly, so the client is marked initialized and
//! notifications reach the client socket.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;
use tower::{Service, ServiceExt};
use tower_lsp::jsonrpc::Request;
use tower_lsp::lsp_types::{LogMessageParams, MessageType, ShowMessageParams};
use tower_lsp::{ClientSocket, LspService};

use pseudocode_language_server::config::ServerConfig;
use pseudocode_language_server::launcher::{OutputMode, ProcessLauncher, ShellLauncher};
use pseudocode_language_server::lsp::PseudocodeBackend;

/// Forwards everything the server sends to the client.
fn forward_client_messages(mut socket: ClientSocket) -> mpsc::UnboundedReceiver<Request> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(message) = socket.next().await {
            if tx.send(message).is_err() {
                break;
            }
        }
    });
    rx
}

/// Runs `initialize` then `initialized` and returns the client messages
/// sent during the handshake.
async fn handshake(grammar: &Path) -> Vec<Request> {
    let config = ServerConfig {
        extension_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        grammar_path: Some(grammar.to_path_buf()),
    };
    let launcher: Arc<dyn ProcessLauncher> = Arc::new(ShellLauncher::new(OutputMode::Capture));
    let (mut service, socket) = LspService::new(move |client| PseudocodeBackend::new(client, config, launcher));
    let mut messages = forward_client_messages(socket);

    let initialize = Request::build("initialize")
        .params(json!({ "capabilities": {} }))
        .id(1)
        .finish();
    let response = service.ready().await.unwrap().call(initialize).await.unwrap();
    let response = response.expect("initialize should be answered");
    assert!(response.is_ok(), "initialize failed: {:?}", response);

    let initialized = Request::build("initialized").params(json!({})).finish();
    let response = service.ready().await.unwrap().call(initialized).await.unwrap();
    assert!(response.is_none());

    let mut received = Vec::new();
    while let Ok(Some(message)) = tokio::time::timeout(Duration::from_millis(300), messages.recv()).await {
        received.push(message);
    }
    received
}

fn notifications<'a>(messages: &'a [Request], method: &'a str) -> impl Iterator<Item = &'a Request> + 'a {
    messages.iter().filter(move |message| message.method() == method)
}

#[tokio::test]
async fn test_missing_grammar_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let grammar = dir.path().join("syntaxes").join("pseudocode.tmLanguage.json");

    let messages = handshake(&grammar).await;

    let shown: Vec<ShowMessageParams> = notifications(&messages, "window/showMessage")
        .map(|message| serde_json::from_value(message.params().cloned().unwrap()).unwrap())
        .collect();
    assert_eq!(shown.len(), 1, "expected a single report, got {:?}", messages);
    assert_eq!(shown[0].typ, MessageType::ERROR);
    assert!(shown[0].message.contains("unavailable"), "{}", shown[0].message);
    assert!(
        shown[0].message.contains(&grammar.display().to_string()),
        "report should name the grammar: {}",
        shown[0].message
    );
}

#[tokio::test]
async fn test_loaded_grammar_is_logged() {
    let grammar = Path::new(env!("CARGO_MANIFEST_DIR")).join("syntaxes/pseudocode.tmLanguage.json");

    let messages = handshake(&grammar).await;

    assert_eq!(notifications(&messages, "window/showMessage").count(), 0);
    let logged: Vec<LogMessageParams> = notifications(&messages, "window/logMessage")
        .map(|message| serde_json::from_value(message.params().cloned().unwrap()).unwrap())
        .collect();
    assert_eq!(logged.len(), 1, "expected a single log message, got {:?}", messages);
    assert_eq!(logged[0].typ, MessageType::INFO);
    assert!(logged[0].message.contains("53 keywords"), "{}", logged[0].message);
}
