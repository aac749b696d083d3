use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use tower_lsp::{LspService, Server};
use tracing::info;

use pseudocode_language_server::config::ServerConfig;
use pseudocode_language_server::launcher::{LaunchRequest, OutputMode, ProcessLauncher, ShellLauncher};
use pseudocode_language_server::logging::init_logger;
use pseudocode_language_server::lsp::PseudocodeBackend;

/// Environment variable the editor's debug configuration uses to name the
/// program to run.
const DEBUG_TARGET_ENV_VAR: &str = "VSCODE_DEBUG_TARGET";

#[derive(Parser, Debug)]
#[command(name = "pseudocode-language-server", version, about = "Language server for Cambridge pseudocode")]
struct Args {
    /// Communicate over stdin/stdout (the only supported transport)
    #[arg(long)]
    stdio: bool,

    /// Grammar file to mine for keywords (overrides PSEUDOCODE_GRAMMAR)
    #[arg(long, value_name = "PATH")]
    grammar: Option<PathBuf>,

    /// Directory the default grammar path is resolved against
    #[arg(long, value_name = "DIR")]
    extension_path: Option<PathBuf>,

    /// Log level for stderr (otherwise RUST_LOG, defaulting to "info")
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Disable ANSI colors in stderr output
    #[arg(long)]
    no_color: bool,

    /// Do not write a session log file
    #[arg(long)]
    no_file_logging: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a pseudocode program with the interpreter and exit with its status
    Launch {
        /// Program to run (defaults to $VSCODE_DEBUG_TARGET)
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Command::Launch { file }) => {
            let guard = init_logger(args.no_color, args.log_level.as_deref().or(Some("warn")), false)
                .context("failed to initialize logging")?;
            let code = launch(file).await?;
            // exit skips destructors; flush the log writer first
            drop(guard);
            std::process::exit(code);
        }
        None => {
            let _guard = init_logger(args.no_color, args.log_level.as_deref(), !args.no_file_logging)
                .context("failed to initialize logging")?;
            if !args.stdio {
                info!("No transport flag given; using stdio");
            }
            serve(ServerConfig::from_env_or_default(args.extension_path, args.grammar)).await;
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) {
    info!("Starting pseudocode language server over stdio");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let launcher: Arc<dyn ProcessLauncher> = Arc::new(ShellLauncher::new(OutputMode::Capture));

    let (service, socket) = LspService::new(|client| PseudocodeBackend::new(client, config, launcher));
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Pseudocode language server stopped");
}

/// Runs the interpreter on `file` with inherited stdio. Returns the exit code.
async fn launch(file: Option<PathBuf>) -> anyhow::Result<i32> {
    let file = file
        .or_else(|| std::env::var_os(DEBUG_TARGET_ENV_VAR).map(PathBuf::from))
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or_else(|| anyhow!("no program to run: pass a file or set {}", DEBUG_TARGET_ENV_VAR))?;

    let launcher = ShellLauncher::new(OutputMode::Inherit);
    let outcome = launcher.launch(&LaunchRequest::run(&file)).await?;
    Ok(outcome.status.code().unwrap_or(1))
}
