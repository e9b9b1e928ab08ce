// Task store backed by a single SQLite table

use crate::error::{Error, Result};
use crate::models::{Priority, Task, TaskId};
use crate::validate;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Database file used when no location is configured
pub const DEFAULT_DB_FILE: &str = "todo.db";

const SCHEMA_VERSION: u32 = 1;

const SELECT_TASKS: &str = "SELECT id, title, completed, priority, due_date, created_at FROM tasks";

/// Owned handle to the task database
///
/// Opened once by the host and held for its lifetime. Call [`Store::close`]
/// to shut down explicitly and observe close failures.
pub struct Store {
    path: Option<PathBuf>,
    db: Connection,
}

impl Store {
    /// Open or create a store at the given database file
    ///
    /// Missing parent directories are created. Schema creation is idempotent,
    /// so this is safe to call on every startup.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let db = Connection::open(path)?;
        let store = Self {
            path: Some(path.to_path_buf()),
            db,
        };
        store.create_schema()?;

        info!(path = %path.display(), "Opened task store");
        Ok(store)
    }

    /// Open a private store that lives only as long as the handle
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            path: None,
            db: Connection::open_in_memory()?,
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Location of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the SQLite database connection
    pub fn db(&self) -> &Connection {
        &self.db
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                completed BOOLEAN DEFAULT FALSE,
                priority TEXT CHECK(priority IN ('low', 'medium', 'high')) DEFAULT 'medium',
                due_date DATETIME NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        if self.schema_version()? == 0 {
            self.db
                .execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))?;
        }

        Ok(())
    }

    /// Schema version stamped in `PRAGMA user_version`
    pub fn schema_version(&self) -> Result<u32> {
        let version = self.db.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Insert a new task and return it with its assigned id
    pub fn add_task(&mut self, title: &str, priority: Priority, due_date: Option<NaiveDate>) -> Result<Task> {
        validate::title(title)?;
        if let Some(due) = due_date {
            validate::due_date_not_past(due, validate::today())?;
        }

        let created_at = Utc::now();
        self.db.execute(
            "INSERT INTO tasks (title, completed, priority, due_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![title, false, priority, due_date, created_at],
        )?;

        let id = TaskId(self.db.last_insert_rowid());
        debug!(%id, title, %priority, ?due_date, "add_task: inserted");

        Ok(Task {
            id,
            title: title.to_string(),
            completed: false,
            priority,
            due_date,
            created_at,
        })
    }

    /// All tasks in ascending id order
    pub fn get_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.db.prepare(&format!("{} ORDER BY id", SELECT_TASKS))?;
        let rows = stmt.query_map([], task_from_row)?;

        let mut tasks = Vec::new();
        for row_result in rows {
            tasks.push(row_result?);
        }
        Ok(tasks)
    }

    /// Get a task by id
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        let task = self
            .db
            .query_row(&format!("{} WHERE id = ?1", SELECT_TASKS), [id], task_from_row)
            .optional()?;
        Ok(task)
    }

    /// Flip the completion flag of a task
    pub fn toggle_task_completion(&mut self, id: TaskId) -> Result<()> {
        let tx = self.db.transaction()?;

        let completed: bool = tx
            .query_row("SELECT completed FROM tasks WHERE id = ?1", [id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| task_not_found(id))?;

        tx.execute(
            "UPDATE tasks SET completed = ?1 WHERE id = ?2",
            params![!completed, id],
        )?;
        tx.commit()?;

        debug!(%id, completed = !completed, "toggle_task_completion: updated");
        Ok(())
    }

    /// Delete a task
    pub fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let affected = self.db.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(task_not_found(id));
        }

        debug!(%id, "delete_task: removed");
        Ok(())
    }

    /// Close the connection
    pub fn close(self) -> Result<()> {
        self.db.close().map_err(|(_, e)| Error::Store(e))?;
        info!("Closed task store");
        Ok(())
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
        priority: row.get(3)?,
        due_date: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn task_not_found(id: TaskId) -> Error {
    Error::NotFound(format!("task {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, Store) {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().join(DEFAULT_DB_FILE)).unwrap();
        (temp, store)
    }

    fn far_future() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()
    }

    #[test]
    fn test_store_open_creates_database() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("nested/dir/todo.db");

        let store = Store::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(store.path(), Some(db_path.as_path()));
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let (temp, mut store) = open_temp();
        store.add_task("Existing", Priority::High, None).unwrap();
        store.create_schema().unwrap();
        store.close().unwrap();

        let store = Store::open(temp.path().join(DEFAULT_DB_FILE)).unwrap();
        assert_eq!(store.get_tasks().unwrap().len(), 1);
    }

    #[test]
    fn test_add_task() {
        let (_temp, mut store) = open_temp();

        let before = Utc::now();
        let task = store.add_task("Buy milk", Priority::Low, Some(far_future())).unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.due_date, Some(far_future()));
        assert!(!task.completed);
        assert!(task.created_at >= before);
    }

    #[test]
    fn test_add_task_empty_title_persists_nothing() {
        let (_temp, mut store) = open_temp();

        let err = store.add_task("", Priority::Medium, None).unwrap_err();
        assert!(err.is_validation());
        assert!(store.get_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_add_task_past_due_date() {
        let (_temp, mut store) = open_temp();

        let past = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let err = store.add_task("Old", Priority::Medium, Some(past)).unwrap_err();
        assert!(err.is_validation());

        let yesterday = validate::today().checked_sub_days(Days::new(1)).unwrap();
        assert!(store.add_task("Late", Priority::Medium, Some(yesterday)).is_err());
        assert!(store.get_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_add_task_due_today() {
        let (_temp, mut store) = open_temp();

        let task = store.add_task("Today", Priority::Medium, Some(validate::today())).unwrap();
        assert_eq!(task.due_date, Some(validate::today()));
    }

    #[test]
    fn test_ids_are_unique_and_not_reused() {
        let (_temp, mut store) = open_temp();

        let first = store.add_task("One", Priority::Low, None).unwrap();
        let second = store.add_task("Two", Priority::Low, None).unwrap();
        assert_ne!(first.id, second.id);

        store.delete_task(second.id).unwrap();
        let third = store.add_task("Three", Priority::Low, None).unwrap();
        assert!(third.id > second.id);
    }

    #[test]
    fn test_get_tasks_round_trip() {
        let (_temp, mut store) = open_temp();

        let with_due = store.add_task("Buy milk", Priority::Low, Some(far_future())).unwrap();
        let without_due = store.add_task("Call mom", Priority::High, None).unwrap();

        let tasks = store.get_tasks().unwrap();
        assert_eq!(tasks, vec![with_due, without_due]);
        assert_eq!(tasks[1].due_date, None);
    }

    #[test]
    fn test_get_task_nonexistent() {
        let (_temp, store) = open_temp();
        assert!(store.get_task(TaskId(99)).unwrap().is_none());
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (_temp, mut store) = open_temp();
        let task = store.add_task("Toggle me", Priority::Medium, None).unwrap();

        store.toggle_task_completion(task.id).unwrap();
        assert!(store.get_task(task.id).unwrap().unwrap().completed);

        store.toggle_task_completion(task.id).unwrap();
        assert!(!store.get_task(task.id).unwrap().unwrap().completed);
    }

    #[test]
    fn test_toggle_nonexistent() {
        let (_temp, mut store) = open_temp();
        let err = store.toggle_task_completion(TaskId(404)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_task() {
        let (_temp, mut store) = open_temp();
        let keep = store.add_task("Keep", Priority::Medium, None).unwrap();
        let gone = store.add_task("Gone", Priority::Medium, None).unwrap();

        store.delete_task(gone.id).unwrap();

        let tasks = store.get_tasks().unwrap();
        assert_eq!(tasks, vec![keep]);

        let err = store.delete_task(gone.id).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_reads_rows_written_with_column_defaults() {
        let (_temp, store) = open_temp();
        store
            .db()
            .execute("INSERT INTO tasks (title) VALUES (?1)", ["From defaults"])
            .unwrap();

        let tasks = store.get_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::Medium);
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].due_date, None);
    }

    #[test]
    fn test_priority_check_constraint() {
        let (_temp, store) = open_temp();
        let result = store
            .db()
            .execute("INSERT INTO tasks (title, priority) VALUES ('x', 'urgent')", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_reopen_preserves_tasks() {
        let (temp, mut store) = open_temp();
        let task = store.add_task("Persist", Priority::High, Some(far_future())).unwrap();
        store.close().unwrap();

        let mut store = Store::open(temp.path().join(DEFAULT_DB_FILE)).unwrap();
        assert_eq!(store.get_tasks().unwrap(), vec![task.clone()]);

        let next = store.add_task("Next", Priority::Low, None).unwrap();
        assert!(next.id > task.id);
    }

    #[test]
    fn test_open_in_memory() {
        let mut store = Store::open_in_memory().unwrap();
        assert!(store.path().is_none());

        store.add_task("Ephemeral", Priority::Low, None).unwrap();
        assert_eq!(store.get_tasks().unwrap().len(), 1);
    }
}
