//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the `task` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// task - a task tracker with a small query language
#[derive(Parser, Debug)]
#[command(name = "task")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of the default search path
    #[arg(long, global = true, env = "TASKFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Returns true if the command asked for JSON output.
    pub fn wants_json(&self) -> bool {
        matches!(
            self.command,
            Some(Commands::Query {
                output: OutputFormat::Json,
                ..
            }) | Some(Commands::Todo {
                output: OutputFormat::Json
            })
        )
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task, or import tasks from a JSON file
    Add {
        /// Task title
        #[arg(required_unless_present = "from_file")]
        title: Vec<String>,

        /// Priority, higher is worked on first
        #[arg(short, long, allow_negative_numbers = true)]
        priority: Option<f64>,

        /// Context to file the task under
        #[arg(short, long)]
        context: Option<String>,

        /// Longer description of the task
        #[arg(short, long)]
        body: Option<String>,

        /// Make this the task to work on next
        #[arg(short, long, conflicts_with = "priority")]
        top: bool,

        /// Import a task or an array of tasks from a JSON file
        #[arg(short = 'f', long, conflicts_with_all = ["title", "priority", "context", "body", "top"])]
        from_file: Option<PathBuf>,
    },

    /// Query tasks in the list
    #[command(visible_aliases = ["q", "s", "search", "list"])]
    Query {
        /// Query expression, e.g. "priority > 5 and title ~ trash"
        #[arg(allow_hyphen_values = true)]
        query: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show incomplete tasks
    Todo {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show the task to work on next
    #[command(alias = "n")]
    Next {
        /// Print only the task id
        #[arg(short, long, conflicts_with = "title_only")]
        id_only: bool,

        /// Print only the task title
        #[arg(short, long)]
        title_only: bool,
    },

    /// Complete tasks; with no id, completes the current task
    #[command(visible_aliases = ["done", "d"])]
    Complete {
        /// Task ids
        ids: Vec<String>,
    },

    /// Add a note to a task
    Note {
        /// Task id
        id: String,

        /// Note text
        #[arg(required = true)]
        body: Vec<String>,
    },

    /// Make a task the current one by raising its priority
    Workon {
        /// Task id
        id: String,
    },

    /// Edit a task in $EDITOR as TOML; with no id, edits the current task
    Edit {
        /// Task id
        id: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show the config file in use
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// How query results are printed
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Text,
    Json,
    Csv,
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
