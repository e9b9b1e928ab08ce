// todolist - Single-user task tracking on SQLite

pub mod app;
pub mod error;
pub mod models;
pub mod store;
pub mod validate;

// Re-export main types for convenience
pub use app::App;
pub use error::{Error, Result};
pub use models::{Priority, Task, TaskId};
pub use store::{DEFAULT_DB_FILE, Store};
