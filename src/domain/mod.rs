//! Domain models for task-cli
//!
//! Contains the task model and its vocabulary without any file I/O.

mod clock;
mod id;
mod status;
mod task;
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use id::{canonical, parse_canonical, IdError, IdSource, RandomIds, SeededIds};
pub use status::{Status, StatusError};
pub use task::{Task, TaskError};
pub use timestamp::TimestampError;
