use clap::Parser;
use std::process::ExitCode;

use taskforge_lists::ListError;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.wants_json() {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Initializes logging to stderr.
///
/// Uses `RUST_LOG` if set, otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    let Some(command) = &cli.command else {
        if !ctx.quiet {
            println!("task - a task tracker with a small query language");
            println!("Use --help for usage information");
        }
        return Ok(());
    };

    match command {
        Commands::Add {
            title,
            priority,
            context,
            body,
            top,
            from_file,
        } => commands::add::execute(
            &ctx,
            &commands::add::AddOptions {
                title: title.clone(),
                priority: *priority,
                context: context.clone(),
                body: body.clone(),
                top: *top,
                from_file: from_file.clone(),
            },
        ),
        Commands::Query { query, output } => commands::query::execute(
            &ctx,
            &commands::query::QueryOptions {
                query: query.clone(),
                output: *output,
            },
        ),
        Commands::Todo { output } => commands::todo::execute(&ctx, *output),
        Commands::Next {
            id_only,
            title_only,
        } => commands::next::execute(
            &ctx,
            &commands::next::NextOptions {
                id_only: *id_only,
                title_only: *title_only,
            },
        ),
        Commands::Complete { ids } => commands::complete::execute(&ctx, ids),
        Commands::Note { id, body } => commands::note::execute(&ctx, id, body),
        Commands::Workon { id } => commands::workon::execute(&ctx, id),
        Commands::Edit { id } => commands::edit::execute(&ctx, id.as_deref()),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Init { force }) => commands::config::execute_init(&ctx, *force),
        },
        Commands::Completions { shell } => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::List(ListError::NotFound { .. }) => "NOT_FOUND",
        CommandError::List(ListError::NoCurrentTask) => "NO_CURRENT_TASK",
        CommandError::List(ListError::Query(_)) => "QUERY_ERROR",
        CommandError::List(ListError::InvalidConfig(_) | ListError::UnknownList(_))
        | CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::List(ListError::Io { .. }) | CommandError::Io(_) => "IO_ERROR",
        CommandError::List(_) => "LIST_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
        CommandError::Csv(_) => "CSV_ERROR",
        CommandError::Editor(_) => "EDITOR_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Json(_) | CommandError::Csv(_) | CommandError::Editor(_) => {
            ExitCode::from(1)
        }
        CommandError::List(ListError::NotFound { .. } | ListError::NoCurrentTask) => {
            ExitCode::from(4)
        }
        CommandError::List(ListError::Query(_)) => ExitCode::from(1),
        CommandError::List(ListError::Io { .. }) | CommandError::Io(_) => ExitCode::from(3),
        CommandError::List(ListError::InvalidConfig(_) | ListError::UnknownList(_))
        | CommandError::Config(_) => ExitCode::from(5),
        CommandError::List(_) => ExitCode::from(6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serial_test::serial;
    use taskforge_lists::{List, Task};
    use tempfile::TempDir;

    /// Parses `args` with a config pointing at a document list in `dir`.
    fn cli_in(dir: &TempDir, args: &[&str]) -> Cli {
        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            format!(
                "[list]\nname = \"document\"\n[list.config]\ndirectory = {:?}\n",
                dir.path().display().to_string()
            ),
        )
        .unwrap();

        let mut argv = vec!["task", "--quiet", "--config"];
        let config = config.display().to_string();
        argv.push(&config);
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn tasks_in(dir: &TempDir) -> Vec<Task> {
        taskforge_lists::DocumentList::open_in_directory(dir.path())
            .unwrap()
            .list()
            .unwrap()
    }

    #[test]
    #[serial]
    fn test_add_then_complete_current() {
        let dir = TempDir::new().unwrap();
        run(&cli_in(&dir, &["add", "take", "out", "the", "trash", "-p", "6"])).unwrap();
        run(&cli_in(&dir, &["add", "buy", "milk"])).unwrap();

        let tasks = tasks_in(&dir);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "take out the trash");

        run(&cli_in(&dir, &["done"])).unwrap();
        let tasks = tasks_in(&dir);
        assert!(tasks[0].is_completed());
        assert!(!tasks[1].is_completed());
    }

    #[test]
    #[serial]
    fn test_workon_and_note() {
        let dir = TempDir::new().unwrap();
        run(&cli_in(&dir, &["add", "first", "-p", "3"])).unwrap();
        run(&cli_in(&dir, &["add", "second"])).unwrap();
        let second = tasks_in(&dir)[1].id.clone();

        run(&cli_in(&dir, &["workon", &second])).unwrap();
        run(&cli_in(&dir, &["note", &second, "started", "today"])).unwrap();

        let tasks = tasks_in(&dir);
        assert_eq!(tasks[1].priority, 3.1);
        assert_eq!(tasks[1].notes[0].body, "started today");
    }

    #[test]
    #[serial]
    fn test_edit_uses_editor_from_environment() {
        let dir = TempDir::new().unwrap();
        run(&cli_in(&dir, &["add", "take", "out", "the", "trash", "-p", "6"])).unwrap();
        run(&cli_in(&dir, &["add", "buy", "milk"])).unwrap();
        let milk = tasks_in(&dir)[1].id.clone();

        std::env::set_var("EDITOR", "sed -i s/milk/oatmilk/");
        let by_id = run(&cli_in(&dir, &["edit", &milk]));
        std::env::set_var("EDITOR", "sed -i s/^context.*/context=\"home\"/");
        let current = run(&cli_in(&dir, &["edit"]));
        std::env::remove_var("EDITOR");
        by_id.unwrap();
        current.unwrap();

        let tasks = tasks_in(&dir);
        assert_eq!(tasks[0].context, "home");
        assert_eq!(tasks[1].title, "buy oatmilk");
        assert_eq!(tasks[1].id, milk);

        let err = run(&cli_in(&dir, &["edit", "missing"])).unwrap_err();
        assert_eq!(error_code(&err), "NOT_FOUND");
    }

    #[test]
    #[serial]
    fn test_errors_map_to_codes() {
        let dir = TempDir::new().unwrap();

        let err = run(&cli_in(&dir, &["query", "1", "and", "2"])).unwrap_err();
        assert_eq!(error_code(&err), "QUERY_ERROR");
        assert_eq!(error_exit_code(&err), ExitCode::from(1));

        let err = run(&cli_in(&dir, &["complete", "missing"])).unwrap_err();
        assert_eq!(error_code(&err), "NOT_FOUND");
        assert_eq!(error_exit_code(&err), ExitCode::from(4));

        let missing = dir.path().join("missing.toml").display().to_string();
        let cli = Cli::parse_from(["task", "--config", &missing, "todo"]);
        let err = run(&cli).unwrap_err();
        assert_eq!(error_code(&err), "CONFIG_ERROR");
        assert_eq!(error_exit_code(&err), ExitCode::from(5));
    }

    #[test]
    fn test_unknown_list_is_config_error() {
        let err = CommandError::List(ListError::UnknownList("mongo".to_string()));
        assert_eq!(error_code(&err), "CONFIG_ERROR");
        assert_eq!(error_exit_code(&err), ExitCode::from(5));
    }
}
