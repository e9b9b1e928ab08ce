use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use todolist::{App, DEFAULT_DB_FILE, Priority, Task};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "todolist CLI - Track tasks in a local SQLite database")]
#[command(version)]
struct Cli {
    /// Path to the database file
    #[arg(short, long, env = "TODOLIST_DB", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        title: String,

        /// low, medium or high (anything else is stored as medium)
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Due date as YYYY-MM-DD
        #[arg(short = 'u', long)]
        due: Option<String>,
    },

    /// List all tasks
    List,

    /// Toggle completion of a task
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut app =
        App::startup(&cli.db).with_context(|| format!("Failed to open task store at {}", cli.db.display()))?;

    match cli.command {
        Commands::Add { title, priority, due } => {
            let task = app
                .add_task(&title, &priority, due.as_deref())
                .context("Failed to add task")?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Added task {}", task.id);
                print_task(&task);
            }
        }
        Commands::List => {
            let tasks = app.get_tasks().context("Failed to list tasks")?;
            if cli.json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks yet. Add one with `todolist add <TITLE>`");
            } else {
                tasks.iter().for_each(print_task);
            }
        }
        Commands::Toggle { id } => {
            app.toggle_task_completion(&id)
                .with_context(|| format!("Failed to toggle task {}", id))?;
            if !cli.json {
                println!("Toggled task {}", id);
            }
        }
        Commands::Delete { id } => {
            app.delete_task(&id)
                .with_context(|| format!("Failed to delete task {}", id))?;
            if !cli.json {
                println!("Deleted task {}", id);
            }
        }
    }

    app.shutdown().context("Failed to close task store")?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_task(task: &Task) {
    let mark = if task.completed { "[x]".green() } else { "[ ]".normal() };
    let title = if task.completed {
        task.title.strikethrough().dimmed()
    } else {
        task.title.normal()
    };
    let priority = match task.priority {
        Priority::High => "high".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".green(),
    };
    let due = task.due_date.map(|d| format!("  due {}", d)).unwrap_or_default();

    println!("{:>4} {} {} ({}){}", task.id.to_string(), mark, title, priority, due.dimmed());
}
