//! Task management commands.

use crate::app::App;
use crate::output;
use clap::Subcommand;
use quadboard_core::{Task, TaskStatus};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task in the uncategorized inbox
    Create {
        /// Task title (at most 100 characters)
        title: String,
    },
    /// List the board, grouped by quadrant
    List {
        /// Filter by status (e.g. urgent_important)
        #[arg(long)]
        status: Option<String>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Move a task to another status
    Move {
        /// Task ID
        id: String,
        /// Target status (uncategorized, urgent_important, ...)
        status: String,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Ask the backend to break a task down into subtasks
    Breakdown {
        /// Task ID
        id: String,
    },
}

pub async fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::bootstrap()?;
    app.require_api()?;

    match action {
        TaskAction::Create { title } => {
            app.engine.create_task(&title).await;
        }
        TaskAction::List { status, json } => {
            app.sync().await?;
            let store = app.store.lock().unwrap();
            match status {
                Some(raw) => {
                    let status = TaskStatus::parse(&raw);
                    let tasks: Vec<&Task> =
                        store.tasks.iter().filter(|t| t.status == status).collect();
                    if json {
                        println!("{}", serde_json::to_string_pretty(&tasks)?);
                    } else {
                        for task in tasks {
                            output::print_task_line(task);
                        }
                    }
                }
                None if json => {
                    println!("{}", serde_json::to_string_pretty(&store.tasks)?);
                }
                None => output::print_board(&store),
            }
        }
        TaskAction::Move { id, status } => {
            let status = TaskStatus::parse(&status);
            if !status.is_known() {
                return Err(format!("unknown status '{status}'").into());
            }
            app.sync().await?;
            app.engine.update_task_status(&id, status).await;
        }
        TaskAction::Complete { id } => {
            app.sync().await?;
            app.engine.complete_task(&id).await;
        }
        TaskAction::Delete { id } => {
            app.sync().await?;
            app.engine.delete_task(&id).await;
        }
        TaskAction::Breakdown { id } => {
            app.sync().await?;
            app.engine.request_breakdown(&id).await;
            let store = app.store.lock().unwrap();
            if let Some(selected) = store.selected_task() {
                println!("first subtask: {}  {}", selected.id, selected.title);
            }
        }
    }
    Ok(())
}
