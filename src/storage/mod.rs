//! # Storage Layer
//!
//! Persistence for task-cli.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | One JSON object keyed by task id | `src/main/resources/TaskList.json` (default) |
//! | Config | TOML | `~/.config/task-cli/config.toml` |
//!
//! ## Write Safety
//!
//! [`TaskStore`] writes the whole document to a temp file in the target
//! directory, syncs it, then renames it into place. Concurrent invocations
//! are last-writer-wins, but the file is never seen half-written.

mod config;
mod json;

pub use config::{Config, ConfigError, GlobalConfig, DEFAULT_TASK_FILE, TASK_FILE_ENV};
pub use json::{select, Document, StoreError, TaskStore};
