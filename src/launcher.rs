//! Build and run launchers
//!
//! The server does not compile or interpret pseudocode itself. The build and
//! run commands hand a [`LaunchRequest`] to a [`ProcessLauncher`], which runs
//! the external `pseudoc` compiler or `pseudor` interpreter in a shell.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info};

pub const COMPILER_PROGRAM: &str = "pseudoc";
pub const INTERPRETER_PROGRAM: &str = "pseudor";

/// A command line to run in a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Human-readable name, e.g. "Pseudocode Build".
    pub title: String,
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchRequest {
    /// `pseudoc "<source>" "<source without extension>"`
    pub fn build(source: &Path) -> Self {
        Self {
            title: "Pseudocode Build".to_string(),
            program: COMPILER_PROGRAM.to_string(),
            args: vec![
                source.display().to_string(),
                output_base_name(source).display().to_string(),
            ],
        }
    }

    /// `pseudor "<source>"`
    pub fn run(source: &Path) -> Self {
        Self {
            title: "Pseudocode Run".to_string(),
            program: INTERPRETER_PROGRAM.to_string(),
            args: vec![source.display().to_string()],
        }
    }

    /// The full shell command line with every argument double-quoted.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push('"');
            push_quoted(&mut line, arg);
            line.push('"');
        }
        line
    }
}

/// `sh` treats these as special inside double quotes.
#[cfg(not(windows))]
fn push_quoted(line: &mut String, arg: &str) {
    for ch in arg.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            line.push('\\');
        }
        line.push(ch);
    }
}

/// `cmd` has no backslash escape; an embedded quote is doubled.
#[cfg(windows)]
fn push_quoted(line: &mut String, arg: &str) {
    for ch in arg.chars() {
        if ch == '"' {
            line.push('"');
        }
        line.push(ch);
    }
}

/// Strips the final extension from `path`, keeping its directory.
/// Paths without an extension (including dotfiles and a trailing `.`) are
/// returned unchanged.
pub fn output_base_name(path: &Path) -> PathBuf {
    match (path.extension(), path.file_stem()) {
        (Some(extension), Some(stem)) if !extension.is_empty() => path.with_file_name(stem),
        _ => path.to_path_buf(),
    }
}

/// Result of a finished launch.
#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    pub status: ExitStatus,
    /// Combined stdout and stderr when captured, empty otherwise.
    pub output: String,
}

/// Common interface for launching external processes.
#[async_trait::async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Runs the request to completion.
    async fn launch(&self, request: &LaunchRequest) -> anyhow::Result<LaunchOutcome>;

    /// Get a human-readable name for this launcher (for logging/debugging)
    fn launcher_name(&self) -> &'static str;
}

/// How a launched process' standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Share the parent's streams (terminal use).
    Inherit,
    /// Collect output; required while stdout carries the LSP protocol.
    Capture,
}

/// Runs requests through the platform shell.
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    mode: OutputMode,
}

impl ShellLauncher {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    fn shell_command(command_line: &str) -> Command {
        #[cfg(windows)]
        {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(command_line);
            command
        }
        #[cfg(not(windows))]
        {
            let mut command = Command::new("sh");
            command.arg("-c").arg(command_line);
            command
        }
    }
}

#[async_trait::async_trait]
impl ProcessLauncher for ShellLauncher {
    async fn launch(&self, request: &LaunchRequest) -> anyhow::Result<LaunchOutcome> {
        let command_line = request.command_line();
        info!("{}: {}", request.title, command_line);

        let mut command = Self::shell_command(&command_line);
        match self.mode {
            OutputMode::Inherit => {
                let status = command
                    .status()
                    .await
                    .with_context(|| format!("failed to start `{}`", command_line))?;
                debug!("{} exited with {}", request.title, status);
                Ok(LaunchOutcome { status, output: String::new() })
            }
            OutputMode::Capture => {
                let output = command
                    .stdin(Stdio::null())
                    .output()
                    .await
                    .with_context(|| format!("failed to start `{}`", command_line))?;
                debug!("{} exited with {}", request.title, output.status);

                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                Ok(LaunchOutcome { status: output.status, output: text })
            }
        }
    }

    fn launcher_name(&self) -> &'static str {
        "shell"
    }
}
