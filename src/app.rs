// String-typed operation surface bound by a host shell

use crate::error::{Error, Result};
use crate::models::{Task, TaskId};
use crate::store::Store;
use crate::validate;
use std::path::Path;

/// Host-facing wrapper around a [`Store`]
///
/// Accepts the loosely typed values a UI hands over (priority and due date as
/// strings, ids as strings) and converts them before they reach the store.
/// Unknown priorities become medium; an empty due date means none.
pub struct App {
    store: Store,
}

impl App {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Open the store at `path`; a failure here should abort the host
    pub fn startup<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Store::open(path)?))
    }

    pub fn shutdown(self) -> Result<()> {
        self.store.close()
    }

    pub fn add_task(&mut self, title: &str, priority: &str, due_date: Option<&str>) -> Result<Task> {
        validate::title(title)?;
        let due_date = validate::parse_due_date(due_date)?;
        let priority = validate::coerce_priority(priority);

        self.store.add_task(title, priority, due_date)
    }

    pub fn get_tasks(&self) -> Result<Vec<Task>> {
        self.store.get_tasks()
    }

    pub fn toggle_task_completion(&mut self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        self.store.toggle_task_completion(id)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        self.store.delete_task(id)
    }
}

// A non-numeric id cannot match any row
fn parse_id(raw: &str) -> Result<TaskId> {
    raw.parse().map_err(|_| Error::NotFound(format!("task {:?}", raw)))
}
