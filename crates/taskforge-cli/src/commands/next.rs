//! Next command implementation: prints the current task.

use taskforge_lists::ListError;

use super::{CommandContext, Result};
use crate::output::format_task_details;

/// Options for the next command.
#[derive(Debug, Default)]
pub struct NextOptions {
    pub id_only: bool,
    pub title_only: bool,
}

/// Executes the next command.
pub fn execute(ctx: &CommandContext, opts: &NextOptions) -> Result<()> {
    let list = ctx.open_list()?;
    let task = match list.current() {
        Ok(task) => task,
        Err(ListError::NoCurrentTask) => {
            if !ctx.quiet {
                println!("No current task!");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if opts.id_only {
        println!("{}", task.id);
    } else if opts.title_only {
        println!("{}", task.title);
    } else if !ctx.quiet {
        print!("{}", format_task_details(&task, ctx.use_colors));
    }
    Ok(())
}
