//! Config command implementation.
//!
//! The config file is TOML. It is looked up in this order, first hit wins:
//!
//! 1. `--config <path>` or `TASKFORGE_CONFIG`
//! 2. `./taskforge.toml`
//! 3. `~/.taskforge.d/config.toml`
//! 4. `/etc/taskforge.d/config.toml`
//!
//! With no file, the defaults below apply.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use taskforge_lists::ListConfig;
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# Taskforge configuration

# Where tasks are stored. `name` is "sqlite" or "document".
[list]
name = "sqlite"

[list.config]
# Directory holding tasks.sqlite3 (or tasks.json for the document list)
directory = "~/.taskforge.d"
# file_name = "~/tasks.sqlite3"  # Exact file, wins over directory
# in_memory = false              # Keep tasks in memory only
"#;

/// Configuration file structure.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Task list settings.
    #[serde(default)]
    pub list: ListConfig,
}

/// Returns the per-user config file, `~/.taskforge.d/config.toml`.
fn user_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".taskforge.d").join("config.toml"))
}

/// Returns the default search path, in lookup order.
fn search_path() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("taskforge.toml")];
    paths.extend(user_config_path());
    paths.push(PathBuf::from("/etc/taskforge.d/config.toml"));
    paths
}

/// Finds the config file to use, if any.
///
/// An explicit path is returned as-is whether or not it exists.
pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    search_path().into_iter().find(|path| path.is_file())
}

/// Parses config file contents.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))
}

/// Loads the configuration, falling back to defaults when no file is found.
///
/// # Errors
///
/// Returns `CommandError::Config` if an explicit path does not exist or a
/// file cannot be read or parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let Some(path) = find_config_path(explicit) else {
        debug!("no config file found, using defaults");
        return Ok(Config::default());
    };

    if !path.is_file() {
        return Err(CommandError::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;
    debug!(path = %path.display(), "loaded config");
    parse_config(&content)
}

/// Executes `config show`.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config(ctx.config_path.as_deref())?;
    let content = toml::to_string_pretty(&config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    if !ctx.quiet {
        print!("{content}");
    }
    Ok(())
}

/// Executes `config path`.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    match find_config_path(ctx.config_path.as_deref()) {
        Some(path) => println!("{}", path.display()),
        None if !ctx.quiet => eprintln!("No config file found, using defaults."),
        None => {}
    }
    Ok(())
}

/// Executes `config init`: writes the default config to the explicit path,
/// or to `~/.taskforge.d/config.toml`.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => user_config_path().ok_or_else(|| {
            CommandError::Config("Could not determine home directory".to_string())
        })?,
    };

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if !ctx.quiet {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
