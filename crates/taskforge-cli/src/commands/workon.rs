//! Workon command implementation.
//!
//! Raises a task's priority just above the current task's so it becomes the
//! current task.

use taskforge_lists::task::DEFAULT_PRIORITY;
use taskforge_lists::{List, ListError, Task};

use super::{CommandContext, Result};
use crate::output::helpers::{format_priority, truncate_id};

/// Amount a task is raised above the current one.
const PRIORITY_STEP: f64 = 0.1;

/// Returns a priority that outranks the current task, or the default
/// priority raised one step when nothing is left to do.
pub fn top_priority(list: &dyn List) -> Result<f64> {
    let base = match list.current() {
        Ok(task) => task.priority,
        Err(ListError::NoCurrentTask) => DEFAULT_PRIORITY,
        Err(e) => return Err(e.into()),
    };
    Ok(base + PRIORITY_STEP)
}

/// Makes the task with `id` the current task and returns it.
pub fn work_on(list: &mut dyn List, id: &str) -> Result<Task> {
    let mut task = list.find_by_id(id)?;
    task.priority = top_priority(list)?;
    list.update(&task)?;
    Ok(task)
}

/// Executes the workon command.
pub fn execute(ctx: &CommandContext, id: &str) -> Result<()> {
    let mut list = ctx.open_list()?;
    let task = work_on(list.as_mut(), id)?;
    if !ctx.quiet {
        println!(
            "Working on {} (priority {}): {}",
            truncate_id(&task.id),
            format_priority(task.priority),
            task.title
        );
    }
    Ok(())
}
