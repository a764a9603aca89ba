//! Main CLI application structure

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use super::output::Output;
use super::task;
use crate::domain::{Status, StatusError};
use crate::storage::{Config, StoreError, TaskStore, TASK_FILE_ENV};

/// Success, including `--help` and `--version`
pub const EXIT_OK: u8 = 0;
/// Missing task file, unknown id, corrupt file or I/O failure
pub const EXIT_FAILURE: u8 = 1;
/// Bad arguments
pub const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "task-cli", version = "1.0")]
#[command(about = "Track tasks in a local JSON file")]
pub struct Cli {
    /// Task file to read and write [default: src/main/resources/TaskList.json]
    #[arg(long, global = true, env = TASK_FILE_ENV, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task description
        #[arg(value_parser = parse_description)]
        description: String,
    },

    /// Replace a task's description
    Update {
        /// Task ID
        id: Uuid,

        /// New description
        #[arg(value_parser = parse_description)]
        description: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: Uuid,
    },

    /// List tasks, optionally only those with one status
    List {
        /// Status to show: todo, in-progress or done
        #[arg(value_parser = parse_status)]
        status: Option<Status>,
    },

    /// Mark a task as in progress
    MarkInProgress {
        /// Task ID
        id: Uuid,
    },

    /// Mark a task as done
    MarkDone {
        /// Task ID
        id: Uuid,
    },
}

impl Commands {
    /// Short name used in verbose output
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::Update { .. } => "update",
            Commands::Delete { .. } => "delete",
            Commands::List { .. } => "list",
            Commands::MarkInProgress { .. } => "mark-in-progress",
            Commands::MarkDone { .. } => "mark-done",
        }
    }

    /// Example invocation shown after a failure
    pub fn usage(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "task-cli add <description>",
            Commands::Update { .. } => "task-cli update <id> <description>",
            Commands::Delete { .. } => "task-cli delete <id>",
            Commands::List { .. } => "task-cli list [todo|in-progress|done]",
            Commands::MarkInProgress { .. } => "task-cli mark-in-progress <id>",
            Commands::MarkDone { .. } => "task-cli mark-done <id>",
        }
    }
}

fn parse_description(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        return Err("description must not be empty".to_string());
    }
    if raw.contains(['\n', '\r']) {
        return Err("description must be a single line".to_string());
    }
    Ok(raw.to_string())
}

fn parse_status(raw: &str) -> Result<Status, StatusError> {
    raw.parse()
}

/// Main entry point for the CLI
pub fn run() -> ExitCode {
    let stdout = io::stdout();
    let stderr = io::stderr();

    let code = run_with(
        std::env::args_os(),
        |store| store,
        &mut stdout.lock(),
        &mut stderr.lock(),
    );

    ExitCode::from(code)
}

/// Parses `args`, runs one command and returns the process exit status
///
/// `configure` gets the store before the command runs, which is where tests
/// swap in a fixed clock or seeded ids.
pub fn run_with<'a, I, T, F>(
    args: I,
    configure: F,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(TaskStore) -> TaskStore,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => return render_usage_error(&e, out, err),
    };

    let mut output = Output::new(out, err, cli.verbose);
    output.verbose_ctx("cli", &format!("Running {}", cli.command.name()));

    let path = match resolve_task_file(cli.file.as_deref(), &mut output) {
        Ok(path) => path,
        Err(e) => {
            output.error(&format!("{:#}", e));
            return EXIT_FAILURE;
        }
    };

    let store = configure(TaskStore::new(path));

    match task::run(&cli.command, &store, &mut output) {
        Ok(()) => {
            output.verbose("Command completed successfully");
            EXIT_OK
        }
        Err(e) => report(&cli.command, &e, &mut output),
    }
}

/// Writes clap's help, version or usage error where clap wants it
fn render_usage_error(error: &clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> u8 {
    let text = error.render().to_string();
    if error.use_stderr() {
        let _ = write!(err, "{}", text);
    } else if write!(out, "{}", text).and_then(|_| out.flush()).is_err() {
        return EXIT_FAILURE;
    }

    u8::try_from(error.exit_code()).unwrap_or(EXIT_USAGE)
}

fn resolve_task_file(explicit: Option<&Path>, output: &mut Output) -> Result<PathBuf> {
    let config = match explicit {
        Some(_) => Config::default(),
        None => Config::load()?,
    };

    if let Some(source) = &config.source {
        output.verbose_ctx("config", &format!("Loaded {}", source.display()));
    }

    let path = config.task_file(explicit);
    output.verbose_ctx("config", &format!("Task file: {}", path.display()));
    Ok(path)
}

/// Prints a failure and maps it to an exit status
fn report(command: &Commands, error: &anyhow::Error, output: &mut Output) -> u8 {
    output.error(&format!("{:#}", error));

    match error.downcast_ref::<StoreError>() {
        Some(StoreError::Absent { .. }) => {
            output.hint("Add a task first, or point --file / TASKCLI_FILE at an existing task file.");
            output.hint("");
            output.hint(&format!("Example usage: {}", command.usage()));
            EXIT_FAILURE
        }
        Some(StoreError::InvalidTask(_)) => {
            output.hint("");
            output.hint(&format!("Example usage: {}", command.usage()));
            EXIT_USAGE
        }
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("task-cli").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_every_command() {
        let id = "6f1c2a9e-3b7d-4e58-9a0c-1d2e3f4a5b6c";
        let uuid = Uuid::parse_str(id).unwrap();

        assert_eq!(
            parse(&["add", "write report"]).unwrap().command,
            Commands::Add {
                description: "write report".to_string()
            }
        );
        assert_eq!(
            parse(&["update", id, "new text"]).unwrap().command,
            Commands::Update {
                id: uuid,
                description: "new text".to_string()
            }
        );
        assert_eq!(parse(&["delete", id]).unwrap().command, Commands::Delete { id: uuid });
        assert_eq!(
            parse(&["mark-in-progress", id]).unwrap().command,
            Commands::MarkInProgress { id: uuid }
        );
        assert_eq!(parse(&["mark-done", id]).unwrap().command, Commands::MarkDone { id: uuid });
        assert_eq!(parse(&["list"]).unwrap().command, Commands::List { status: None });
        assert_eq!(
            parse(&["list", "in-progress"]).unwrap().command,
            Commands::List {
                status: Some(Status::InProgress)
            }
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        use clap::error::ErrorKind;

        assert_eq!(parse(&["frobnicate"]).unwrap_err().kind(), ErrorKind::InvalidSubcommand);
        assert_eq!(
            parse(&["add"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(parse(&["delete", "42"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["list", "blocked"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["add", "  "]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(
            parse(&["add", "line one\nline two"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
    }

    #[test]
    fn file_flag_is_global() {
        let cli = parse(&["list", "--file", "/tmp/x.json"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/x.json")));
    }

    #[test]
    fn usage_hints_name_the_command() {
        let cmd = Commands::MarkDone { id: Uuid::nil() };
        assert_eq!(cmd.name(), "mark-done");
        assert!(cmd.usage().starts_with("task-cli mark-done"));
    }
}
