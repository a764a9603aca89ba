//! Task CLI commands

use anyhow::{Context, Result};
use uuid::Uuid;

use super::app::Commands;
use super::output::Output;
use crate::domain::{Status, Task};
use crate::storage::TaskStore;

pub fn run(cmd: &Commands, store: &TaskStore, output: &mut Output) -> Result<()> {
    match cmd {
        Commands::Add { description } => add_task(store, output, description),
        Commands::Update { id, description } => update_task(store, output, *id, description),
        Commands::Delete { id } => delete_task(store, output, *id),
        Commands::List { status } => list_tasks(store, output, *status),
        Commands::MarkInProgress { id } => mark_task(store, output, *id, Status::InProgress),
        Commands::MarkDone { id } => mark_task(store, output, *id, Status::Done),
    }
}

fn add_task(store: &TaskStore, output: &mut Output, description: &str) -> Result<()> {
    let task = store.add(description)?;

    output.verbose_ctx("add", &format!("Stored {} in {}", task.id, store.path().display()));
    print_line(output, &format!("Task added successfully (ID: {})", task.id))?;
    Ok(())
}

fn update_task(store: &TaskStore, output: &mut Output, id: Uuid, description: &str) -> Result<()> {
    let task = store.update(id, description)?;

    output.verbose_ctx("update", &format!("Description is now {:?}", task.description));
    print_line(output, &format!("Updated ID: {}", task.id))?;
    Ok(())
}

fn delete_task(store: &TaskStore, output: &mut Output, id: Uuid) -> Result<()> {
    let removed = store.delete(id)?;

    output.verbose_ctx("delete", &format!("Removed {:?}", removed.description));
    print_line(output, &format!("ID: {} deleted.", removed.id))?;
    Ok(())
}

fn mark_task(store: &TaskStore, output: &mut Output, id: Uuid, status: Status) -> Result<()> {
    let task = store.set_status(id, status)?;

    print_line(output, &format!("Marked ID: {} as {}", task.id, task.status))?;
    Ok(())
}

fn list_tasks(store: &TaskStore, output: &mut Output, filter: Option<Status>) -> Result<()> {
    let tasks = store.list(filter)?;

    output.verbose_ctx(
        "list",
        &format!(
            "{} task(s) match filter {}",
            tasks.len(),
            filter.map_or("all", |s| s.as_str())
        ),
    );

    if let (Some(status), true) = (filter, tasks.is_empty()) {
        print_line(output, &format!("There are no items for {} status", status))?;
        return Ok(());
    }

    for task in &tasks {
        print_line(output, &list_line(task)?)?;
    }

    Ok(())
}

fn print_line(output: &mut Output, line: &str) -> Result<()> {
    output.success(line).context("Failed to write to stdout")
}

/// `<id>: <task-json>`
fn list_line(task: &Task) -> Result<String> {
    let json = serde_json::to_string(task).with_context(|| format!("Failed to render task {}", task.id))?;
    Ok(format!("{}: {}", task.id, json))
}
