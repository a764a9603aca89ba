//! task-cli - A command-line task tracker
//!
//! Tasks live in a single local JSON file. Each invocation loads the file,
//! performs one command, and writes the file back.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Status, Task};
pub use storage::{StoreError, TaskStore};
