//! SQLite-backed task list.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use taskforge_ql::{Ast, Evaluator, SqlEvaluator, Value, DATE_FORMAT};
use tracing::{debug, info};

use crate::error::{ListError, Result};
use crate::list::List;
use crate::task::{Note, Task};

/// Database file name used when opening a directory.
pub const DATABASE_FILENAME: &str = "tasks.sqlite3";

const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS tasks(
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT NOT NULL DEFAULT '',
    context TEXT NOT NULL,
    priority REAL NOT NULL,
    created_date TEXT NOT NULL,
    completed_date TEXT
);
CREATE TABLE IF NOT EXISTS notes(
    task_id TEXT NOT NULL REFERENCES tasks(id),
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    created_date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS notes_task_id ON notes(task_id);
";

const SELECT: &str =
    "SELECT id, title, body, context, priority, created_date, completed_date FROM tasks";

const INSERT_TASK: &str = "INSERT INTO tasks
    (id, title, body, context, priority, created_date, completed_date)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const INSERT_NOTE: &str =
    "INSERT INTO notes (task_id, id, body, created_date) VALUES (?1, ?2, ?3, ?4)";

fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(idx: usize, text: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Converts a query literal to the representation its column stores.
fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Number(n) => SqlValue::Real(*n),
        Value::Boolean(b) => SqlValue::Integer(i64::from(*b)),
        Value::Date(d) => SqlValue::Text(format_date(d)),
    }
}

/// Reads a task row without its notes.
fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let created: String = row.get(5)?;
    let completed: Option<String> = row.get(6)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        context: row.get(3)?,
        priority: row.get(4)?,
        created_date: parse_date(5, &created)?,
        completed_date: completed
            .as_deref()
            .map(|text| parse_date(6, text))
            .transpose()?,
        notes: Vec::new(),
    })
}

fn insert_task(conn: &Connection, task: &Task) -> rusqlite::Result<()> {
    conn.execute(
        INSERT_TASK,
        params![
            task.id,
            task.title,
            task.body,
            task.context,
            task.priority,
            format_date(&task.created_date),
            task.completed_date.as_ref().map(format_date),
        ],
    )?;
    for note in &task.notes {
        insert_note(conn, &task.id, note)?;
    }
    Ok(())
}

/// Inserts a new task, reporting a clashing id as `DuplicateId`.
fn insert_new_task(conn: &Connection, task: &Task) -> Result<()> {
    insert_task(conn, task).map_err(|e| match e {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            ListError::DuplicateId {
                id: task.id.clone(),
            }
        }
        other => other.into(),
    })
}

fn insert_note(conn: &Connection, task_id: &str, note: &Note) -> rusqlite::Result<()> {
    conn.execute(
        INSERT_NOTE,
        params![task_id, note.id, note.body, format_date(&note.created_date)],
    )?;
    Ok(())
}

/// A task list stored in a SQLite database.
///
/// Tasks live in a `tasks` table and their notes in a `notes` table keyed by
/// `task_id`. Dates are stored as `%Y-%m-%d %H:%M:%S` text so they sort and
/// compare chronologically.
///
/// # Example
///
/// ```
/// use taskforge_lists::{List, SqliteList, Task};
///
/// let mut list = SqliteList::in_memory()?;
/// list.add(&Task::new("take out the trash").with_priority(6.0))?;
///
/// let found = list.query("priority > 5")?;
/// assert_eq!(found.len(), 1);
/// # Ok::<(), taskforge_lists::ListError>(())
/// ```
#[derive(Debug)]
pub struct SqliteList {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteList {
    /// Opens (or creates) a database file, creating its parent directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ListError::io(parent, e))?;
        }

        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Opens `tasks.sqlite3` inside `directory`.
    pub fn open_in_directory(directory: impl AsRef<Path>) -> Result<Self> {
        Self::open(directory.as_ref().join(DATABASE_FILENAME))
    }

    /// Creates a database that lives only as long as this list.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(CREATE_TABLES)?;
        debug!(path = ?path, "opened sqlite list");
        Ok(Self { conn, path })
    }

    /// Returns the database file, or `None` for in-memory lists.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn notes_for(&self, task_id: &str) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, body, created_date FROM notes WHERE task_id = ?1 ORDER BY rowid",
        )?;
        let notes = stmt
            .query_map([task_id], |row| {
                let created: String = row.get(2)?;
                Ok(Note {
                    id: row.get(0)?,
                    body: row.get(1)?,
                    created_date: parse_date(2, &created)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Attaches notes to tasks read without them.
    fn with_notes(&self, mut tasks: Vec<Task>) -> Result<Vec<Task>> {
        for task in &mut tasks {
            task.notes = self.notes_for(&task.id)?;
        }
        Ok(tasks)
    }

    fn select(&self, sql: &str, params: &[(&str, &dyn ToSql)]) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let tasks = stmt
            .query_map(params, task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        self.with_notes(tasks)
    }

    fn exists(&self, id: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM tasks WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

impl List for SqliteList {
    fn search(&self, ast: &Ast) -> Result<Vec<Task>> {
        let filter = SqlEvaluator.evaluate_ast(ast)?;
        debug!(clause = %filter.clause, params = filter.params.len(), "searching sqlite list");

        let values: Vec<(&str, SqlValue)> = filter
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), to_sql(value)))
            .collect();
        let named: Vec<(&str, &dyn ToSql)> = values
            .iter()
            .map(|(name, value)| (*name, value as &dyn ToSql))
            .collect();

        self.select(
            &format!("{SELECT} WHERE {} ORDER BY rowid", filter.clause),
            &named,
        )
    }

    fn add(&mut self, task: &Task) -> Result<()> {
        let tx = self.conn.transaction()?;
        insert_new_task(&tx, task)?;
        tx.commit()?;
        info!(id = %task.id, "added task");
        Ok(())
    }

    fn add_multiple(&mut self, tasks: &[Task]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for task in tasks {
            insert_new_task(&tx, task)?;
        }
        tx.commit()?;
        info!(count = tasks.len(), "added tasks");
        Ok(())
    }

    fn list(&self) -> Result<Vec<Task>> {
        self.select(&format!("{SELECT} ORDER BY rowid"), &[])
    }

    fn find_by_id(&self, id: &str) -> Result<Task> {
        let task = self
            .conn
            .query_row(&format!("{SELECT} WHERE id = ?1"), [id], task_from_row)
            .optional()?
            .ok_or_else(|| ListError::not_found(id))?;

        let mut tasks = self.with_notes(vec![task])?;
        tasks.pop().ok_or_else(|| ListError::not_found(id))
    }

    fn current(&self) -> Result<Task> {
        let task = self
            .conn
            .query_row(
                &format!(
                    "{SELECT} WHERE completed_date IS NULL \
                     ORDER BY priority DESC, created_date ASC, rowid ASC LIMIT 1"
                ),
                [],
                task_from_row,
            )
            .optional()?
            .ok_or(ListError::NoCurrentTask)?;

        let id = task.id.clone();
        let mut tasks = self.with_notes(vec![task])?;
        tasks.pop().ok_or_else(|| ListError::not_found(id))
    }

    fn complete(&mut self, id: &str) -> Result<()> {
        let mut task = self.find_by_id(id)?;
        task.complete();
        self.conn.execute(
            "UPDATE tasks SET completed_date = ?1 WHERE id = ?2",
            params![task.completed_date.as_ref().map(format_date), id],
        )?;
        info!(id, "completed task");
        Ok(())
    }

    fn update(&mut self, task: &Task) -> Result<()> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE tasks SET title = ?1, body = ?2, context = ?3, priority = ?4,
                created_date = ?5, completed_date = ?6
             WHERE id = ?7",
            params![
                task.title,
                task.body,
                task.context,
                task.priority,
                format_date(&task.created_date),
                task.completed_date.as_ref().map(format_date),
                task.id,
            ],
        )?;
        if changed == 0 {
            return Err(ListError::not_found(&task.id));
        }

        tx.execute("DELETE FROM notes WHERE task_id = ?1", [&task.id])?;
        for note in &task.notes {
            insert_note(&tx, &task.id, note)?;
        }
        tx.commit()?;
        info!(id = %task.id, "updated task");
        Ok(())
    }

    fn add_note(&mut self, id: &str, note: &Note) -> Result<()> {
        if !self.exists(id)? {
            return Err(ListError::not_found(id));
        }
        insert_note(&self.conn, id, note)?;
        info!(id, note = %note.id, "added note");
        Ok(())
    }
}
