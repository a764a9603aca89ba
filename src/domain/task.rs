//! Task domain model
//!
//! A task is a single line of text with a status and two timestamps. The
//! JSON form has exactly the keys `id`, `description`, `status`,
//! `createdAt` and `updatedAt`, all strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::status::Status;
use super::timestamp;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task description must not be empty")]
    EmptyDescription,

    #[error("Task description must be a single line")]
    MultiLineDescription,

    #[error("Task {id} was updated ({updated_at}) before it was created ({created_at})")]
    UpdatedBeforeCreated {
        id: Uuid,
        created_at: String,
        updated_at: String,
    },
}

/// A tracked task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// Free-form single line of text
    pub description: String,

    /// Current status
    pub status: Status,

    /// When the task was created
    #[serde(with = "timestamp::millis")]
    pub created_at: DateTime<Utc>,

    /// When the description or status last changed
    #[serde(with = "timestamp::millis")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `todo` task stamped with `now`
    pub fn new(
        id: Uuid,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskError> {
        let description = description.into();
        check_new_description(&description)?;

        Ok(Self {
            id,
            description,
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the description
    pub fn set_description(
        &mut self,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), TaskError> {
        let description = description.into();
        check_new_description(&description)?;

        self.description = description;
        self.touch(now);
        Ok(())
    }

    /// Moves the task to `status`; any transition is allowed
    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }

    /// Checks the invariants a stored task must satisfy
    ///
    /// Looser than the checks on new descriptions: a stored description only
    /// has to be non-empty.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.description.is_empty() {
            return Err(TaskError::EmptyDescription);
        }

        if self.updated_at < self.created_at {
            return Err(TaskError::UpdatedBeforeCreated {
                id: self.id,
                created_at: timestamp::format(&self.created_at),
                updated_at: timestamp::format(&self.updated_at),
            });
        }

        Ok(())
    }

    // updatedAt never moves backwards, even if the clock does
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }
}

fn check_new_description(description: &str) -> Result<(), TaskError> {
    if description.trim().is_empty() {
        return Err(TaskError::EmptyDescription);
    }
    if description.contains(['\n', '\r']) {
        return Err(TaskError::MultiLineDescription);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(stamp: &str) -> DateTime<Utc> {
        timestamp::parse(stamp).unwrap()
    }

    fn make_task() -> Task {
        let id = Uuid::parse_str("6f1c2a9e-3b7d-4e58-9a0c-1d2e3f4a5b6c").unwrap();
        Task::new(id, "write report", at("2024-01-01T00:00:00.000Z")).unwrap()
    }

    #[test]
    fn new_task_is_todo_with_equal_timestamps() {
        let task = make_task();
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.created_at, task.updated_at);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn new_task_rejects_blank_description() {
        let id = Uuid::new_v4();
        let now = at("2024-01-01T00:00:00.000Z");
        assert_eq!(Task::new(id, "", now), Err(TaskError::EmptyDescription));
        assert_eq!(Task::new(id, "   ", now), Err(TaskError::EmptyDescription));
    }

    #[test]
    fn new_task_rejects_line_breaks() {
        let id = Uuid::new_v4();
        let now = at("2024-01-01T00:00:00.000Z");
        assert_eq!(
            Task::new(id, "line one\nline two", now),
            Err(TaskError::MultiLineDescription)
        );
        assert_eq!(
            Task::new(id, "line one\r\n", now),
            Err(TaskError::MultiLineDescription)
        );
    }

    #[test]
    fn validate_accepts_whitespace_description() {
        let mut task = make_task();
        task.description = " ".to_string();
        assert!(task.validate().is_ok());

        task.description.clear();
        assert_eq!(task.validate(), Err(TaskError::EmptyDescription));
    }

    #[test]
    fn set_description_refreshes_updated_at_only() {
        let mut task = make_task();
        let created = task.created_at;

        task.set_description("write final report", at("2024-01-01T00:00:10.000Z"))
            .unwrap();

        assert_eq!(task.description, "write final report");
        assert_eq!(task.created_at, created);
        assert_eq!(task.updated_at, at("2024-01-01T00:00:10.000Z"));
        assert_eq!(task.status, Status::Todo);
    }

    #[test]
    fn set_description_keeps_old_text_on_error() {
        let mut task = make_task();
        let before = task.clone();

        assert!(task.set_description("", at("2024-01-02T00:00:00.000Z")).is_err());
        assert_eq!(task, before);
    }

    #[test]
    fn any_status_transition_is_allowed() {
        let mut task = make_task();
        let now = at("2024-01-01T00:00:05.000Z");

        task.set_status(Status::Done, now);
        assert_eq!(task.status, Status::Done);

        task.set_status(Status::Todo, now);
        assert_eq!(task.status, Status::Todo);

        task.set_status(Status::InProgress, now);
        assert_eq!(task.status, Status::InProgress);
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let mut task = make_task();
        let later = task.created_at + Duration::seconds(30);

        task.set_status(Status::Done, later);
        task.set_status(Status::Done, task.created_at - Duration::seconds(30));

        assert_eq!(task.updated_at, later);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn json_shape() {
        let task = make_task();
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "6f1c2a9e-3b7d-4e58-9a0c-1d2e3f4a5b6c",
                "description": "write report",
                "status": "todo",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-01T00:00:00.000Z",
            })
        );

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn deserialize_rejects_bad_timestamp() {
        let json = r#"{
            "id": "6f1c2a9e-3b7d-4e58-9a0c-1d2e3f4a5b6c",
            "description": "x",
            "status": "todo",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let err = serde_json::from_str::<Task>(json).unwrap_err();
        assert!(err.to_string().contains("bad timestamp"));
    }

    #[test]
    fn deserialize_rejects_unknown_status_and_keys() {
        let bad_status = r#"{
            "id": "6f1c2a9e-3b7d-4e58-9a0c-1d2e3f4a5b6c",
            "description": "x",
            "status": "IN_PROGRESS",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let err = serde_json::from_str::<Task>(bad_status).unwrap_err();
        assert!(err.to_string().contains("unknown status"));

        let extra_key = r#"{
            "id": "6f1c2a9e-3b7d-4e58-9a0c-1d2e3f4a5b6c",
            "description": "x",
            "status": "todo",
            "priority": "high",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }"#;
        assert!(serde_json::from_str::<Task>(extra_key).is_err());
    }

    #[test]
    fn validate_catches_inverted_timestamps() {
        let mut task = make_task();
        task.updated_at = task.created_at - Duration::milliseconds(1);
        assert!(matches!(
            task.validate(),
            Err(TaskError::UpdatedBeforeCreated { .. })
        ));
    }
}
