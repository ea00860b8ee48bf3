//! Command implementations for the `task` CLI.
//!
//! Each submodule handles one subcommand. Commands that touch tasks open the
//! configured list through [`CommandContext::open_list`].

pub mod add;
pub mod complete;
pub mod completions;
pub mod config;
pub mod edit;
pub mod next;
pub mod note;
pub mod query;
pub mod todo;
pub mod workon;

use std::path::PathBuf;

use taskforge_lists::{List, ListError};
use tracing::debug;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Task list error.
    #[error("{0}")]
    List(#[from] ListError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The editor failed or left an unusable file.
    #[error("edit failed: {0}")]
    Editor(String),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Config file given on the command line or in `TASKFORGE_CONFIG`.
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            use_colors: !cli.no_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
            config_path: cli.config.clone(),
        }
    }

    /// Loads the configuration and opens the list it names.
    pub fn open_list(&self) -> Result<Box<dyn List>> {
        let config = config::load_config(self.config_path.as_deref())?;
        debug!(list = %config.list.name, "opening task list");
        Ok(taskforge_lists::open_list(&config.list)?)
    }
}
