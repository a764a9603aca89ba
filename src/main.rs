//! task-cli - Track tasks in a local JSON file

use std::process::ExitCode;

fn main() -> ExitCode {
    task_cli::cli::run()
}
