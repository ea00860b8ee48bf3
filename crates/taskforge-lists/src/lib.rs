//! Task storage backends for Taskforge.
//!
//! Every backend implements [`List`]. Queries are written in the Taskforge
//! query language and lowered by the evaluator matching the backend:
//!
//! - [`SqliteList`] stores tasks in SQLite and runs [`taskforge_ql::SqlEvaluator`]
//!   predicates.
//! - [`DocumentList`] stores tasks as JSON documents and runs
//!   [`taskforge_ql::DocumentEvaluator`] filters through [`matcher`].
//!
//! Both backends return the same tasks for the same query.

pub mod config;
pub mod document;
pub mod error;
pub mod list;
pub mod matcher;
pub mod sqlite;
pub mod task;

pub use config::{expand_home, open_list, ListConfig, ListSettings, LIST_NAMES};
pub use document::DocumentList;
pub use error::{ListError, Result};
pub use list::List;
pub use sqlite::SqliteList;
pub use task::{Note, Task};
