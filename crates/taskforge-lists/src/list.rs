//! The storage interface shared by every list backend.

use taskforge_ql::{Ast, Parser};
use tracing::debug;

use crate::error::Result;
use crate::task::{Note, Task};

/// A persistent collection of tasks.
///
/// Each backend lowers queries with its own evaluator; callers only ever
/// hand over a parsed [`Ast`].
pub trait List {
    /// Returns the tasks matching a parsed query.
    fn search(&self, ast: &Ast) -> Result<Vec<Task>>;

    /// Adds one task.
    fn add(&mut self, task: &Task) -> Result<()>;

    /// Adds several tasks at once.
    fn add_multiple(&mut self, tasks: &[Task]) -> Result<()>;

    /// Returns every task, in insertion order.
    fn list(&self) -> Result<Vec<Task>>;

    /// Looks a task up by id.
    ///
    /// # Errors
    ///
    /// Returns `ListError::NotFound` if no task has `id`.
    fn find_by_id(&self, id: &str) -> Result<Task>;

    /// Returns the task to work on next: the highest priority uncompleted
    /// task, oldest first among equals.
    ///
    /// # Errors
    ///
    /// Returns `ListError::NoCurrentTask` if every task is completed.
    fn current(&self) -> Result<Task>;

    /// Marks a task completed now.
    fn complete(&mut self, id: &str) -> Result<()>;

    /// Replaces the stored task that has the same id as `task`.
    fn update(&mut self, task: &Task) -> Result<()>;

    /// Appends a note to a task.
    fn add_note(&mut self, id: &str, note: &Note) -> Result<()>;

    /// Parses and runs a query. A blank query returns every task.
    fn query(&self, query: &str) -> Result<Vec<Task>> {
        if query.trim().is_empty() {
            return self.list();
        }
        let ast = Parser::new(query).parse()?;
        debug!(query = %ast, "parsed query");
        self.search(&ast)
    }
}
