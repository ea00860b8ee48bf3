//! Edit command implementation.
//!
//! Writes a task to a temporary TOML file, opens it in the user's editor and
//! stores the edited task once the editor exits.

use std::fs;
use std::io::Write;
use std::process::Command;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use taskforge_lists::task::date_format;
use taskforge_lists::{List, Note, Task};
use tracing::debug;

use super::{CommandContext, CommandError, Result};
use crate::output::helpers::truncate_id;

/// Editor used when neither `$EDITOR` nor `$VISUAL` is set.
pub const DEFAULT_EDITOR: &str = "vi";

/// The fields of a task a user may change.
///
/// TOML has no null, so an open task has no `completed_date` key at all.
#[derive(Debug, Serialize, Deserialize)]
struct EditableTask {
    title: String,
    #[serde(default)]
    body: String,
    context: String,
    priority: f64,
    #[serde(with = "date_format")]
    created_date: NaiveDateTime,
    #[serde(
        with = "date_format::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    completed_date: Option<NaiveDateTime>,
    #[serde(default)]
    notes: Vec<Note>,
}

impl From<&Task> for EditableTask {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            body: task.body.clone(),
            context: task.context.clone(),
            priority: task.priority,
            created_date: task.created_date,
            completed_date: task.completed_date,
            notes: task.notes.clone(),
        }
    }
}

impl EditableTask {
    /// Applies the edited fields to the task with `id`.
    fn into_task(self, id: String) -> Task {
        Task {
            id,
            title: self.title,
            body: self.body,
            context: self.context,
            priority: self.priority,
            created_date: self.created_date,
            completed_date: self.completed_date,
            notes: self.notes,
        }
    }
}

/// Returns the editor command from `$EDITOR`, then `$VISUAL`, falling back
/// to [`DEFAULT_EDITOR`].
pub fn editor_command() -> String {
    ["EDITOR", "VISUAL"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|editor| !editor.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Renders a task as the TOML document handed to the editor.
fn to_toml(task: &Task) -> Result<String> {
    let body = toml::to_string_pretty(&EditableTask::from(task))
        .map_err(|e| CommandError::Editor(format!("cannot write task as TOML: {e}")))?;
    Ok(format!("# Editing task {}\n{body}", task.id))
}

/// Runs `editor` on `path` and waits for it. The editor command may carry
/// its own arguments, separated by whitespace.
fn run_editor(editor: &str, path: &std::path::Path) -> Result<()> {
    let mut words = editor.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| CommandError::Editor("no editor command".to_string()))?;

    debug!(editor, path = %path.display(), "opening editor");
    let status = Command::new(program)
        .args(words)
        .arg(path)
        .status()
        .map_err(|e| CommandError::Editor(format!("cannot run {program}: {e}")))?;

    if !status.success() {
        return Err(CommandError::Editor(format!("{program} exited with {status}")));
    }
    Ok(())
}

/// Opens the task with `id`, or the current task, in `editor` and stores
/// the result. The task keeps its id whatever the file says.
///
/// # Errors
///
/// Returns `CommandError::List` if the task cannot be found or stored and
/// `CommandError::Editor` if the editor fails or leaves invalid TOML behind.
pub fn edit(list: &mut dyn List, id: Option<&str>, editor: &str) -> Result<Task> {
    let task = match id {
        Some(id) => list.find_by_id(id)?,
        None => list.current()?,
    };

    let mut file = tempfile::Builder::new()
        .prefix("task-")
        .suffix(".toml")
        .tempfile()?;
    file.write_all(to_toml(&task)?.as_bytes())?;
    file.flush()?;

    run_editor(editor, file.path())?;

    // Editors may replace the file rather than write through our handle
    let content = fs::read_to_string(file.path())?;
    let edited: EditableTask = toml::from_str(&content)
        .map_err(|e| CommandError::Editor(format!("edited task is not valid: {e}")))?;

    let updated = edited.into_task(task.id);
    list.update(&updated)?;
    Ok(updated)
}

/// Executes the edit command.
pub fn execute(ctx: &CommandContext, id: Option<&str>) -> Result<()> {
    let mut list = ctx.open_list()?;
    let task = edit(list.as_mut(), id, &editor_command())?;
    if !ctx.quiet {
        println!("Updated {}", truncate_id(&task.id));
    }
    Ok(())
}
