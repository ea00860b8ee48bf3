//! JSON-document task list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use taskforge_ql::{Ast, DocumentEvaluator, Evaluator};
use tracing::{debug, info};

use crate::error::{ListError, Result};
use crate::list::List;
use crate::matcher;
use crate::task::{Note, Task};

/// Collection file name used when opening a directory.
pub const COLLECTION_FILENAME: &str = "tasks.json";

/// A task list held as a collection of JSON documents.
///
/// Queries are lowered with [`DocumentEvaluator`] and the resulting filter
/// document is run against each task by [`matcher::matches`]. When the list
/// has a path, every write rewrites the whole collection file.
///
/// # Example
///
/// ```
/// use taskforge_lists::{DocumentList, List, Task};
///
/// let mut list = DocumentList::in_memory();
/// list.add(&Task::new("buy milk"))?;
/// list.add(&Task::new("walk the dog"))?;
///
/// let found = list.query("milk")?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].title, "buy milk");
/// # Ok::<(), taskforge_lists::ListError>(())
/// ```
#[derive(Debug, Default)]
pub struct DocumentList {
    tasks: Vec<Task>,
    path: Option<PathBuf>,
}

impl DocumentList {
    /// Loads a collection file, starting empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `ListError::Io` if the file cannot be read and
    /// `ListError::Json` if it is not a JSON array of tasks.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(ListError::io(path, e)),
        };
        debug!(path = %path.display(), count = tasks.len(), "opened document list");

        Ok(Self {
            tasks,
            path: Some(path),
        })
    }

    /// Opens `tasks.json` inside `directory`.
    pub fn open_in_directory(directory: impl AsRef<Path>) -> Result<Self> {
        Self::open(directory.as_ref().join(COLLECTION_FILENAME))
    }

    /// Creates a list that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Returns the collection file, or `None` for in-memory lists.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes `tasks` atomically (temp file, then rename) and only then
    /// makes them the in-memory collection.
    fn commit(&mut self, tasks: Vec<Task>) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| ListError::io(parent, e))?;
            }

            let json = serde_json::to_string_pretty(&tasks)?;
            let temp_path = path.with_extension("tmp");
            fs::write(&temp_path, json).map_err(|e| ListError::io(&temp_path, e))?;
            fs::rename(&temp_path, path).map_err(|e| ListError::io(path, e))?;
        }
        self.tasks = tasks;
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| ListError::not_found(id))
    }

    /// Returns the collection with `new` appended, rejecting ids that are
    /// already taken.
    fn appended(&self, new: &[Task]) -> Result<Vec<Task>> {
        let mut tasks = self.tasks.clone();
        for task in new {
            if tasks.iter().any(|t| t.id == task.id) {
                return Err(ListError::DuplicateId {
                    id: task.id.clone(),
                });
            }
            tasks.push(task.clone());
        }
        Ok(tasks)
    }
}

impl List for DocumentList {
    fn search(&self, ast: &Ast) -> Result<Vec<Task>> {
        let filter = DocumentEvaluator.evaluate_ast(ast)?;
        debug!(filter = %filter, "searching document list");

        let mut found = Vec::new();
        for task in &self.tasks {
            if matcher::matches(&filter, &serde_json::to_value(task)?)? {
                found.push(task.clone());
            }
        }
        Ok(found)
    }

    fn add(&mut self, task: &Task) -> Result<()> {
        let tasks = self.appended(std::slice::from_ref(task))?;
        self.commit(tasks)?;
        info!(id = %task.id, "added task");
        Ok(())
    }

    fn add_multiple(&mut self, tasks: &[Task]) -> Result<()> {
        let all = self.appended(tasks)?;
        self.commit(all)?;
        info!(count = tasks.len(), "added tasks");
        Ok(())
    }

    fn list(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn find_by_id(&self, id: &str) -> Result<Task> {
        Ok(self.tasks[self.position(id)?].clone())
    }

    fn current(&self) -> Result<Task> {
        self.tasks
            .iter()
            .filter(|task| !task.is_completed())
            .min_by(|a, b| a.work_order(b))
            .cloned()
            .ok_or(ListError::NoCurrentTask)
    }

    fn complete(&mut self, id: &str) -> Result<()> {
        let index = self.position(id)?;
        let mut tasks = self.tasks.clone();
        tasks[index].complete();
        self.commit(tasks)?;
        info!(id, "completed task");
        Ok(())
    }

    fn update(&mut self, task: &Task) -> Result<()> {
        let index = self.position(&task.id)?;
        let mut tasks = self.tasks.clone();
        tasks[index] = task.clone();
        self.commit(tasks)?;
        info!(id = %task.id, "updated task");
        Ok(())
    }

    fn add_note(&mut self, id: &str, note: &Note) -> Result<()> {
        let index = self.position(id)?;
        let mut tasks = self.tasks.clone();
        tasks[index].notes.push(note.clone());
        self.commit(tasks)?;
        info!(id, note = %note.id, "added note");
        Ok(())
    }
}
