//! Choosing and opening a list backend from configuration.

use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::document::DocumentList;
use crate::error::{ListError, Result};
use crate::list::List;
use crate::sqlite::SqliteList;

/// Backend names accepted in `[list] name`.
pub const LIST_NAMES: &[&str] = &["sqlite", "document"];

/// The `[list]` section of the configuration file.
///
/// ```toml
/// [list]
/// name = "sqlite"
///
/// [list.config]
/// directory = "~/.taskforge.d"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Backend name, one of [`LIST_NAMES`].
    pub name: String,

    /// Backend settings.
    #[serde(default)]
    pub config: ListSettings,
}

/// Where a backend keeps its data. `file_name` wins over `directory`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    /// Directory holding the backend's default file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Exact file to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Keep everything in memory; nothing is written.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub in_memory: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            name: "sqlite".to_string(),
            config: ListSettings {
                directory: Some("~/.taskforge.d".to_string()),
                ..ListSettings::default()
            },
        }
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let home = || BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    match path.strip_prefix('~') {
        Some(rest) => match home() {
            Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

enum Location {
    File(PathBuf),
    Directory(PathBuf),
    Memory,
}

impl ListSettings {
    fn location(&self) -> Result<Location> {
        if self.in_memory {
            return Ok(Location::Memory);
        }
        match (&self.file_name, &self.directory) {
            (Some(file), _) => Ok(Location::File(expand_home(file))),
            (None, Some(dir)) => Ok(Location::Directory(expand_home(dir))),
            (None, None) => Err(ListError::InvalidConfig(
                "either directory or file_name must be provided".to_string(),
            )),
        }
    }
}

/// Opens the backend named by `config`.
///
/// # Errors
///
/// Returns `ListError::UnknownList` for names not in [`LIST_NAMES`] and
/// `ListError::InvalidConfig` when no location is configured.
///
/// # Example
///
/// ```
/// use taskforge_lists::{open_list, ListConfig, ListSettings, Task};
///
/// let config = ListConfig {
///     name: "document".to_string(),
///     config: ListSettings { in_memory: true, ..Default::default() },
/// };
/// let mut list = open_list(&config)?;
/// list.add(&Task::new("task 1"))?;
/// assert_eq!(list.list()?.len(), 1);
/// # Ok::<(), taskforge_lists::ListError>(())
/// ```
pub fn open_list(config: &ListConfig) -> Result<Box<dyn List>> {
    let location = config.config.location();
    match config.name.as_str() {
        "sqlite" => Ok(Box::new(match location? {
            Location::File(path) => SqliteList::open(path)?,
            Location::Directory(dir) => SqliteList::open_in_directory(dir)?,
            Location::Memory => SqliteList::in_memory()?,
        })),
        "document" => Ok(Box::new(match location? {
            Location::File(path) => DocumentList::open(path)?,
            Location::Directory(dir) => DocumentList::open_in_directory(dir)?,
            Location::Memory => DocumentList::in_memory(),
        })),
        other => Err(ListError::UnknownList(other.to_string())),
    }
}
