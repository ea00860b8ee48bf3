//! Query command implementation.
//!
//! Runs a query against the configured list and prints the matches. With no
//! query every task is printed.

use taskforge_lists::{List, Task};

use super::{CommandContext, Result};
use crate::cli::OutputFormat;
use crate::output::format_tasks;

/// Options for the query command.
#[derive(Debug)]
pub struct QueryOptions {
    /// Query words, joined with spaces before parsing.
    pub query: Vec<String>,
    /// Output format.
    pub output: OutputFormat,
}

/// Prints tasks. Table and text output are suppressed in quiet mode.
pub fn print_tasks(ctx: &CommandContext, tasks: &[Task], format: OutputFormat) -> Result<()> {
    if ctx.quiet && matches!(format, OutputFormat::Table | OutputFormat::Text) {
        return Ok(());
    }
    print!("{}", format_tasks(tasks, format, ctx.use_colors)?);
    Ok(())
}

/// Executes the query command.
pub fn execute(ctx: &CommandContext, opts: &QueryOptions) -> Result<()> {
    let list = ctx.open_list()?;
    let tasks = list.query(&opts.query.join(" "))?;
    print_tasks(ctx, &tasks, opts.output)
}
