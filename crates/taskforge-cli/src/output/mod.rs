//! Output formatting utilities for the `task` CLI.
//!
//! - [`tasks`] - Task output in table, text, JSON and CSV form
//! - [`helpers`] - Common formatting utilities (truncation, dates, colors)

pub mod helpers;
mod tasks;

pub use tasks::{format_task_details, format_tasks};
