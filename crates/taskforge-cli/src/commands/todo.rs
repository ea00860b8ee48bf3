//! Todo command implementation: prints every incomplete task.

use taskforge_lists::{List, Task};
use taskforge_ql::{Ast, Expression, Operator, Value};

use super::query::print_tasks;
use super::{CommandContext, Result};
use crate::cli::OutputFormat;

/// The query `completed = false`.
fn incomplete() -> Ast {
    Ast::new(Expression::infix(
        Operator::Eq,
        Expression::string("completed"),
        Expression::literal(Value::Boolean(false)),
    ))
}

/// Returns the incomplete tasks in `list`.
pub fn find_incomplete(list: &dyn List) -> Result<Vec<Task>> {
    Ok(list.search(&incomplete())?)
}

/// Executes the todo command.
pub fn execute(ctx: &CommandContext, output: OutputFormat) -> Result<()> {
    let list = ctx.open_list()?;
    let tasks = find_incomplete(list.as_ref())?;
    print_tasks(ctx, &tasks, output)
}
