pub mod completion;
pub mod config;
pub mod grammar;
pub mod launcher;
pub mod logging;
pub mod lsp;
