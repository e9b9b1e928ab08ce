//! Basic task operations
//!
//! Adds, lists, toggles, and deletes a task through the host-facing surface.
//!
//! Run with: cargo run --example basic_crud

use eyre::Result;
use todolist::{App, DEFAULT_DB_FILE};

fn main() -> Result<()> {
    // Create a temporary directory for this example
    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join(DEFAULT_DB_FILE);

    println!("todolist Basic CRUD Example");
    println!("===========================\n");
    println!("Database: {}\n", db_path.display());

    let mut app = App::startup(&db_path)?;

    println!("1. ADD - Adding tasks...");
    let milk = app.add_task("Buy milk", "low", Some("2099-12-31"))?;
    println!("   Created task {}: {}", milk.id, serde_json::to_string(&milk)?);
    let report = app.add_task("Write report", "urgent", None)?;
    println!("   Created task {} with priority coerced to {}\n", report.id, report.priority);

    println!("2. VALIDATION - Rejected input...");
    for (title, due) in [("", None), ("Too late", Some("2000-01-01")), ("Bad date", Some("31/12/2099"))] {
        match app.add_task(title, "high", due) {
            Ok(task) => println!("   Unexpectedly accepted {}", task.id),
            Err(e) => println!("   {:?} -> {}", title, e),
        }
    }
    println!();

    println!("3. TOGGLE - Completing task {}...", milk.id);
    app.toggle_task_completion(&milk.id.to_string())?;
    for task in app.get_tasks()? {
        println!("   - {} [{}] {}", task.id, if task.completed { "x" } else { " " }, task.title);
    }
    println!();

    println!("4. DELETE - Removing task {}...", milk.id);
    app.delete_task(&milk.id.to_string())?;
    println!("   Remaining tasks: {}\n", app.get_tasks()?.len());

    app.shutdown()?;
    println!("Example complete!");
    Ok(())
}
