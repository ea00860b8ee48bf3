//! Task output formatting.

use serde::Serialize;
use taskforge_lists::Task;

use super::helpers::{
    bold, dim, format_date, format_optional_date, format_priority, truncate_str,
};
use crate::cli::OutputFormat;
use crate::commands::Result;

/// Longest title shown in a table cell.
const TITLE_WIDTH: usize = 60;

const TABLE_HEADER: [&str; 6] = [
    "ID",
    "Created Date",
    "Completed Date",
    "Priority",
    "Title",
    "Context",
];

/// One CSV record. Notes are left out.
#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    created_date: String,
    completed_date: String,
    priority: f64,
    title: &'a str,
    context: &'a str,
    body: &'a str,
}

/// Formats tasks in the requested format.
pub fn format_tasks(tasks: &[Task], format: OutputFormat, use_colors: bool) -> Result<String> {
    Ok(match format {
        OutputFormat::Table => format_tasks_table(tasks, use_colors),
        OutputFormat::Text => format_tasks_text(tasks, use_colors),
        OutputFormat::Json => format_tasks_json(tasks)?,
        OutputFormat::Csv => format_tasks_csv(tasks)?,
    })
}

/// Formats tasks as a pipe-delimited table sized to its widest cells.
pub fn format_tasks_table(tasks: &[Task], use_colors: bool) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let rows: Vec<[String; 6]> = tasks
        .iter()
        .map(|task| {
            [
                task.id.clone(),
                format_date(&task.created_date),
                format_optional_date(task.completed_date.as_ref()),
                format_priority(task.priority),
                truncate_str(&task.title, TITLE_WIDTH),
                task.context.clone(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADER.map(|cell| cell.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut output = String::new();
    let header = TABLE_HEADER.map(str::to_string);
    output.push_str(&dim(&render(&header), use_colors));
    output.push('\n');

    for (task, row) in tasks.iter().zip(&rows) {
        let line = render(row);
        if task.is_completed() {
            output.push_str(&dim(&line, use_colors));
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }

    output
}

/// Formats one task with its body and notes.
pub fn format_task_details(task: &Task, use_colors: bool) -> String {
    let label = |name: &str| dim(&format!("{name:<10}"), use_colors);

    let mut output = String::new();
    output.push_str(&format!("{} {}\n", label("ID:"), task.id));
    output.push_str(&format!("{} {}\n", label("Title:"), bold(&task.title, use_colors)));
    output.push_str(&format!("{} {}\n", label("Context:"), task.context));
    output.push_str(&format!(
        "{} {}\n",
        label("Priority:"),
        format_priority(task.priority)
    ));
    output.push_str(&format!(
        "{} {}\n",
        label("Created:"),
        format_date(&task.created_date)
    ));
    if let Some(completed) = &task.completed_date {
        output.push_str(&format!("{} {}\n", label("Completed:"), format_date(completed)));
    }

    if !task.body.is_empty() {
        output.push('\n');
        for line in task.body.lines() {
            output.push_str(&format!("  {line}\n"));
        }
    }

    if !task.notes.is_empty() {
        output.push_str(&format!("\n{}\n", label("Notes:")));
        for note in &task.notes {
            output.push_str(&format!(
                "  {} {}\n",
                dim(&format_date(&note.created_date), use_colors),
                note.body
            ));
        }
    }

    output
}

/// Formats tasks as detail blocks separated by blank lines.
pub fn format_tasks_text(tasks: &[Task], use_colors: bool) -> String {
    tasks
        .iter()
        .map(|task| format_task_details(task, use_colors))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats tasks as a pretty JSON array, notes included.
pub fn format_tasks_json(tasks: &[Task]) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(tasks)?;
    json.push('\n');
    Ok(json)
}

/// Formats tasks as CSV with a header row.
pub fn format_tasks_csv(tasks: &[Task]) -> csv::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for task in tasks {
        writer.serialize(CsvRow {
            id: &task.id,
            created_date: format_date(&task.created_date),
            completed_date: format_optional_date(task.completed_date.as_ref()),
            priority: task.priority,
            title: &task.title,
            context: &task.context,
            body: &task.body,
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use taskforge_lists::Note;

    fn date(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn tasks() -> Vec<Task> {
        let mut trash = Task::new("take out the trash")
            .with_context("home")
            .with_priority(6.0)
            .with_created_date(date(1));
        trash.id = "task1".to_string();
        trash.notes.push(Note {
            id: "n1".to_string(),
            body: "bins go out tuesday".to_string(),
            created_date: date(2),
        });

        let mut milk = Task::new("buy milk, eggs")
            .with_body("whole milk")
            .with_created_date(date(3))
            .with_completed_date(date(4));
        milk.id = "task2".to_string();

        vec![trash, milk]
    }

    #[test]
    fn test_table_columns_align() {
        let output = format_tasks_table(&tasks(), false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("| ID    | Created Date        | Completed Date      |"));
        assert!(lines[1].contains("| 6        | take out the trash | home    |"));
        assert!(lines[2].contains("| 2018-01-04 12:00:00 | 1        |"));
        let width = lines[0].len();
        assert!(lines.iter().all(|line| line.len() == width));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_tasks_table(&[], false), "No tasks found.\n");
    }

    #[test]
    fn test_text_includes_body_and_notes() {
        let output = format_tasks_text(&tasks(), false);
        assert!(output.contains("Title:     take out the trash"));
        assert!(output.contains("  2018-01-02 12:00:00 bins go out tuesday"));
        assert!(output.contains("Completed: 2018-01-04 12:00:00"));
        assert!(output.contains("  whole milk"));
    }

    #[test]
    fn test_json_is_task_array() {
        let output = format_tasks_json(&tasks()).unwrap();
        let parsed: Vec<Task> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, tasks());
        assert_eq!(parsed[0].notes.len(), 1);
        assert_eq!(parsed[1].completed_date, Some(date(4)));
    }

    #[test]
    fn test_csv_quotes_and_header() {
        let output = format_tasks_csv(&tasks()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "id,created_date,completed_date,priority,title,context,body"
        );
        assert_eq!(
            lines[1],
            "task1,2018-01-01 12:00:00,,6.0,take out the trash,home,"
        );
        assert!(lines[2].contains("\"buy milk, eggs\""));
        assert!(lines[2].starts_with("task2,2018-01-03 12:00:00,2018-01-04 12:00:00,1.0,"));
        assert!(lines[2].ends_with(",whole milk"));
        assert_eq!(lines.len(), 3);
    }
}
