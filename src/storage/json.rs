//! JSON storage for tasks
//!
//! All tasks live in one JSON object keyed by canonical task id. Every
//! mutation is a full read-modify-write of that document, and every write
//! goes through a temp file in the same directory followed by a rename, so
//! readers only ever see a complete document.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{self, Clock, IdSource, RandomIds, Status, SystemClock, Task, TaskError};

/// All tasks in a task file, keyed by id
pub type Document = BTreeMap<Uuid, Task>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task file {} is missing or has no tasks", .path.display())]
    Absent { path: PathBuf },

    #[error("corrupt store {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Task not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    InvalidTask(#[from] TaskError),

    #[error("Failed to {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Store for task data in a single JSON file
pub struct TaskStore {
    path: PathBuf,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
}

impl TaskStore {
    /// Creates a store over the given file using the system clock and random ids
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: Box::new(SystemClock),
            ids: Box::new(RandomIds),
        }
    }

    /// Replaces the time source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the id source
    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document
    ///
    /// A missing or zero-length file is an empty document.
    pub fn load(&self) -> Result<Document, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(self.corrupt(e.to_string()))
            }
            Err(e) => return Err(self.io_error("read", e)),
        };

        if raw.is_empty() {
            return Ok(Document::new());
        }

        self.parse(&raw)
    }

    /// Writes the whole document, replacing the previous file atomically
    pub fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(dir).map_err(|e| Self::io_error_at("create directory", dir, e))?;

        let mut temp =
            NamedTempFile::new_in(dir).map_err(|e| Self::io_error_at("create temp file in", dir, e))?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, doc)
                .map_err(|e| self.io_error("serialize", e.into()))?;
            writer
                .write_all(b"\n")
                .and_then(|_| writer.flush())
                .map_err(|e| self.io_error("write", e))?;
        }

        temp.as_file()
            .sync_all()
            .map_err(|e| self.io_error("sync", e))?;

        temp.persist(&self.path)
            .map_err(|e| self.io_error("replace", e.error))?;

        Ok(())
    }

    /// Creates a `todo` task and returns it
    ///
    /// Works against a missing or empty file.
    pub fn add(&self, description: &str) -> Result<Task, StoreError> {
        let mut doc = self.load()?;

        let id = self.fresh_id(&doc);
        let task = Task::new(id, description, self.clock.now())?;

        doc.insert(id, task.clone());
        self.save(&doc)?;

        Ok(task)
    }

    /// Replaces a task's description
    pub fn update(&self, id: Uuid, description: &str) -> Result<Task, StoreError> {
        self.modify(id, |task, now| task.set_description(description, now))
    }

    /// Moves a task to another status
    pub fn set_status(&self, id: Uuid, status: Status) -> Result<Task, StoreError> {
        self.modify(id, |task, now| {
            task.set_status(status, now);
            Ok(())
        })
    }

    /// Removes a task and returns what was removed
    pub fn delete(&self, id: Uuid) -> Result<Task, StoreError> {
        let mut doc = self.load_existing()?;

        let removed = doc.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.save(&doc)?;

        Ok(removed)
    }

    /// Looks up a single task
    pub fn get(&self, id: Uuid) -> Result<Task, StoreError> {
        let doc = self.load_existing()?;
        doc.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Lists tasks, optionally only those with the given status
    pub fn list(&self, filter: Option<Status>) -> Result<Vec<Task>, StoreError> {
        let doc = self.load_existing()?;
        Ok(select(&doc, filter))
    }

    /// Loads the document, requiring at least one task
    fn load_existing(&self) -> Result<Document, StoreError> {
        let doc = self.load()?;
        if doc.is_empty() {
            return Err(StoreError::Absent {
                path: self.path.clone(),
            });
        }
        Ok(doc)
    }

    fn modify<F>(&self, id: Uuid, change: F) -> Result<Task, StoreError>
    where
        F: FnOnce(&mut Task, DateTime<Utc>) -> Result<(), TaskError>,
    {
        let mut doc = self.load_existing()?;

        let task = doc.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        change(task, self.clock.now())?;
        let task = task.clone();

        self.save(&doc)?;
        Ok(task)
    }

    fn fresh_id(&self, doc: &Document) -> Uuid {
        loop {
            let id = self.ids.next_id();
            if !doc.contains_key(&id) {
                return id;
            }
        }
    }

    fn parse(&self, raw: &str) -> Result<Document, StoreError> {
        let entries: BTreeMap<String, Task> =
            serde_json::from_str(raw).map_err(|e| self.corrupt(e.to_string()))?;

        let mut doc = Document::new();
        for (key, task) in entries {
            let id = domain::parse_canonical(&key).map_err(|e| self.corrupt(e.to_string()))?;
            if id != task.id {
                return Err(self.corrupt(format!(
                    "key {} does not match task id {}",
                    key, task.id
                )));
            }
            task.validate().map_err(|e| self.corrupt(e.to_string()))?;
            doc.insert(id, task);
        }

        Ok(doc)
    }

    fn corrupt(&self, reason: String) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            reason,
        }
    }

    fn io_error(&self, action: &'static str, source: io::Error) -> StoreError {
        Self::io_error_at(action, &self.path, source)
    }

    fn io_error_at(action: &'static str, path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Tasks matching `filter` (all tasks for `None`), oldest first
pub fn select(doc: &Document, filter: Option<Status>) -> Vec<Task> {
    let mut tasks: Vec<Task> = doc
        .values()
        .filter(|task| filter.map_or(true, |status| task.status == status))
        .cloned()
        .collect();
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    tasks
}
