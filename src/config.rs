//! Server configuration
//!
//! The grammar path is resolved with this precedence:
//! 1. `grammarPath` in the client's `initializationOptions`
//! 2. `--grammar` on the command line
//! 3. The `PSEUDOCODE_GRAMMAR` environment variable
//! 4. `<extension-path>/syntaxes/pseudocode.tmLanguage.json`

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

pub const GRAMMAR_ENV_VAR: &str = "PSEUDOCODE_GRAMMAR";
pub const DEFAULT_GRAMMAR_PATH: &str = "syntaxes/pseudocode.tmLanguage.json";

/// Options a client may pass in `initialize`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InitializationOptions {
    #[serde(default)]
    pub grammar_path: Option<PathBuf>,
}

impl InitializationOptions {
    /// Parses the raw `initializationOptions` value. Unknown or malformed
    /// options are ignored with a warning.
    pub fn from_value(value: Option<serde_json::Value>) -> Self {
        match value {
            None | Some(serde_json::Value::Null) => Self::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Ignoring malformed initializationOptions: {}", e);
                Self::default()
            }),
        }
    }
}

/// Static configuration fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Root directory the default grammar path is relative to.
    pub extension_path: PathBuf,
    /// Explicit grammar file from the command line or environment.
    pub grammar_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            extension_path: PathBuf::from("."),
            grammar_path: None,
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from command-line values, falling back to
    /// the environment for the grammar path.
    pub fn from_env_or_default(extension_path: Option<PathBuf>, grammar_path: Option<PathBuf>) -> Self {
        let env_grammar = std::env::var_os(GRAMMAR_ENV_VAR).map(PathBuf::from);
        Self::resolve(extension_path, grammar_path, env_grammar)
    }

    fn resolve(
        extension_path: Option<PathBuf>,
        grammar_path: Option<PathBuf>,
        env_grammar: Option<PathBuf>,
    ) -> Self {
        Self {
            extension_path: extension_path.unwrap_or_else(|| PathBuf::from(".")),
            grammar_path: grammar_path.or(env_grammar).filter(|path| !path.as_os_str().is_empty()),
        }
    }

    /// The grammar file to load for a session.
    pub fn grammar_path(&self, options: &InitializationOptions) -> PathBuf {
        if let Some(path) = &options.grammar_path {
            return self.relative_to_extension(path);
        }
        match &self.grammar_path {
            Some(path) => path.clone(),
            None => self.extension_path.join(DEFAULT_GRAMMAR_PATH),
        }
    }

    fn relative_to_extension(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.extension_path.join(path)
        }
    }
}
