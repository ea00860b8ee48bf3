//! Complete command implementation.
//!
//! Completes the given tasks, or the current task when no id is given.

use taskforge_lists::{List, ListError, Task};

use super::{CommandContext, Result};
use crate::output::helpers::truncate_id;

/// Completes the tasks with `ids`, or the current task when `ids` is empty,
/// returning the tasks that were completed.
///
/// Stops at the first id that does not exist; earlier ids stay completed.
pub fn complete(list: &mut dyn List, ids: &[String]) -> Result<Vec<Task>> {
    if ids.is_empty() {
        let current = match list.current() {
            Ok(task) => task,
            Err(ListError::NoCurrentTask) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        list.complete(&current.id)?;
        return Ok(vec![current]);
    }

    let mut completed = Vec::with_capacity(ids.len());
    for id in ids {
        let task = list.find_by_id(id)?;
        list.complete(id)?;
        completed.push(task);
    }
    Ok(completed)
}

/// Executes the complete command.
pub fn execute(ctx: &CommandContext, ids: &[String]) -> Result<()> {
    let mut list = ctx.open_list()?;
    let completed = complete(list.as_mut(), ids)?;

    if ctx.quiet {
        return Ok(());
    }
    if completed.is_empty() {
        println!("No ID given and no uncompleted task found");
    }
    for task in &completed {
        println!("Completed {}: {}", truncate_id(&task.id), task.title);
    }
    Ok(())
}
