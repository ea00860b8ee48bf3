//! Add command implementation.
//!
//! Adds a single task built from flags, or imports tasks from a JSON file
//! holding either one task object or an array of them.

use std::fs;
use std::path::{Path, PathBuf};

use taskforge_lists::task::{DEFAULT_CONTEXT, DEFAULT_PRIORITY};
use taskforge_lists::{List, Task};

use super::workon::top_priority;
use super::{CommandContext, Result};
use crate::output::helpers::truncate_id;

/// Options for the add command.
#[derive(Debug, Default)]
pub struct AddOptions {
    /// Title words, joined with spaces.
    pub title: Vec<String>,
    pub priority: Option<f64>,
    pub context: Option<String>,
    pub body: Option<String>,
    /// Outrank the current task.
    pub top: bool,
    /// Import from this file instead; all other options are ignored.
    pub from_file: Option<PathBuf>,
}

/// Tasks in an import file.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Import {
    Many(Vec<Task>),
    One(Task),
}

/// Reads tasks from a JSON import file.
pub fn read_import(path: &Path) -> Result<Vec<Task>> {
    let content = fs::read_to_string(path)?;
    Ok(match serde_json::from_str(&content)? {
        Import::Many(tasks) => tasks,
        Import::One(task) => vec![task],
    })
}

/// Adds the task (or imported tasks) described by `opts`, returning them.
pub fn add(list: &mut dyn List, opts: &AddOptions) -> Result<Vec<Task>> {
    if let Some(path) = &opts.from_file {
        let tasks = read_import(path)?;
        list.add_multiple(&tasks)?;
        return Ok(tasks);
    }

    let priority = if opts.top {
        top_priority(list)?
    } else {
        opts.priority.unwrap_or(DEFAULT_PRIORITY)
    };
    let task = Task::new(opts.title.join(" "))
        .with_priority(priority)
        .with_context(opts.context.as_deref().unwrap_or(DEFAULT_CONTEXT))
        .with_body(opts.body.as_deref().unwrap_or_default());

    list.add(&task)?;
    Ok(vec![task])
}

/// Executes the add command.
pub fn execute(ctx: &CommandContext, opts: &AddOptions) -> Result<()> {
    let mut list = ctx.open_list()?;
    let added = add(list.as_mut(), opts)?;

    if !ctx.quiet {
        match added.as_slice() {
            [task] => println!("Added {}: {}", truncate_id(&task.id), task.title),
            tasks => println!("Imported {} tasks", tasks.len()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;
    use taskforge_lists::{DocumentList, SqliteList};
    use tempfile::TempDir;

    fn words(title: &str) -> Vec<String> {
        title.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_add_with_defaults() {
        let mut list = SqliteList::in_memory().unwrap();
        let added = add(
            &mut list,
            &AddOptions {
                title: words("take out the trash"),
                ..Default::default()
            },
        )
        .unwrap();

        let stored = list.find_by_id(&added[0].id).unwrap();
        assert_eq!(stored.title, "take out the trash");
        assert_eq!(stored.priority, DEFAULT_PRIORITY);
        assert_eq!(stored.context, DEFAULT_CONTEXT);
        assert!(stored.body.is_empty());
    }

    #[test]
    fn test_add_with_flags() {
        let mut list = DocumentList::in_memory();
        add(
            &mut list,
            &AddOptions {
                title: words("call mom"),
                priority: Some(3.5),
                context: Some("family".to_string()),
                body: Some("about the weekend".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let found = list.query("context = family").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].priority, 3.5);
        assert_eq!(found[0].body, "about the weekend");
    }

    #[test]
    fn test_add_top() {
        let mut list = DocumentList::in_memory();
        list.add(&Task::new("urgent").with_priority(4.0)).unwrap();
        let added = add(
            &mut list,
            &AddOptions {
                title: words("more urgent"),
                top: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(list.current().unwrap(), added[0]);
    }

    #[test]
    fn test_import_array_and_object() {
        let temp_dir = TempDir::new().unwrap();
        let many = temp_dir.path().join("many.json");
        fs::write(
            &many,
            r#"[
                {"title": "task 1", "priority": 2.0},
                {"title": "task 2", "context": "work",
                 "created_date": "2018-01-01 00:00:00",
                 "notes": [{"body": "a note"}]}
            ]"#,
        )
        .unwrap();
        let one = temp_dir.path().join("one.json");
        fs::write(&one, r#"{"title": "task 3"}"#).unwrap();

        let mut list = SqliteList::in_memory().unwrap();
        for path in [many, one] {
            add(
                &mut list,
                &AddOptions {
                    from_file: Some(path),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        assert_eq!(list.list().unwrap().len(), 3);
        let work = list.query("context = work").unwrap();
        assert_eq!(work[0].notes[0].body, "a note");
        assert_eq!(list.query("created_date < '2018-01-02'").unwrap().len(), 1);
    }

    #[test]
    fn test_import_errors() {
        let temp_dir = TempDir::new().unwrap();
        let mut list = DocumentList::in_memory();

        let missing = AddOptions {
            from_file: Some(temp_dir.path().join("missing.json")),
            ..Default::default()
        };
        assert!(matches!(add(&mut list, &missing), Err(CommandError::Io(_))));

        let bad = temp_dir.path().join("bad.json");
        fs::write(&bad, r#"{"priority": 1}"#).unwrap();
        let bad = AddOptions {
            from_file: Some(bad),
            ..Default::default()
        };
        assert!(matches!(add(&mut list, &bad), Err(CommandError::Json(_))));
        assert!(list.list().unwrap().is_empty());
    }
}
