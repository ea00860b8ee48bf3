//! Note command implementation.

use taskforge_lists::{List, Note};

use super::{CommandContext, Result};
use crate::output::helpers::truncate_id;

/// Adds a note made of `words` to the task with `id`.
pub fn add_note(list: &mut dyn List, id: &str, words: &[String]) -> Result<Note> {
    let note = Note::new(words.join(" "));
    list.add_note(id, &note)?;
    Ok(note)
}

/// Executes the note command.
pub fn execute(ctx: &CommandContext, id: &str, words: &[String]) -> Result<()> {
    let mut list = ctx.open_list()?;
    add_note(list.as_mut(), id, words)?;
    if !ctx.quiet {
        println!("Added note to {}", truncate_id(id));
    }
    Ok(())
}
