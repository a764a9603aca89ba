//! # Command-Line Interface
//!
//! Argument parsing, command dispatch and output formatting.
//!
//! ## Commands
//!
//! | Command | Arguments | Prints |
//! |---------|-----------|--------|
//! | `add` | `<description>` | `Task added successfully (ID: <id>)` |
//! | `update` | `<id> <description>` | `Updated ID: <id>` |
//! | `delete` | `<id>` | `ID: <id> deleted.` |
//! | `mark-in-progress` | `<id>` | `Marked ID: <id> as in-progress` |
//! | `mark-done` | `<id>` | `Marked ID: <id> as done` |
//! | `list` | `[todo\|in-progress\|done]` | one `<id>: <json>` line per task |
//!
//! ## Exit Codes
//!
//! - `0` success (including `--help` and `--version`)
//! - `1` missing task file, unknown id, corrupt file, I/O or config failure
//! - `2` bad arguments
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! task-cli --verbose list done
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command, or
//! [`run_with()`] to drive it with explicit arguments and writers.

mod app;
mod output;
mod task;

pub use app::{run, run_with, Cli, Commands, EXIT_FAILURE, EXIT_OK, EXIT_USAGE};
pub use output::Output;
