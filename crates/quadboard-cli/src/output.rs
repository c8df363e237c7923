//! Terminal rendering: feedback lines and the quadrant board.

use quadboard_core::{ConnectionStatus, FeedbackKind, Renderer, Store, Task, TaskStatus};

pub struct CliRenderer;

impl Renderer for CliRenderer {
    fn show_feedback(&self, kind: FeedbackKind, message: &str) {
        match kind {
            FeedbackKind::Success => println!("{message}"),
            FeedbackKind::Info | FeedbackKind::Error => eprintln!("{message}"),
        }
    }

    fn connection_changed(&self, status: ConnectionStatus, detail: &str) {
        tracing::debug!(?status, detail, "connection changed");
    }
}

pub fn print_task_line(task: &Task) {
    let parent = task
        .parent_task_title
        .as_deref()
        .map(|title| format!("  (from: {title})"))
        .unwrap_or_default();
    println!("  {}  {}{parent}", task.id, task.title);
}

/// Text rendering of the board: inbox, the four quadrants, completed pile,
/// then anything carrying a server-side status outside the known set.
pub fn print_board(store: &Store) {
    let mut sections = vec![TaskStatus::Uncategorized];
    sections.extend(TaskStatus::QUADRANTS);
    sections.push(TaskStatus::Completed);

    for status in &sections {
        let tasks: Vec<&Task> = store.tasks.iter().filter(|t| &t.status == status).collect();
        println!("{} ({})", status.label(), tasks.len());
        for task in tasks {
            print_task_line(task);
        }
        println!();
    }

    let strays: Vec<&Task> = store.tasks.iter().filter(|t| !t.status.is_known()).collect();
    if !strays.is_empty() {
        println!("Other");
        for task in strays {
            println!("  {}  {} [{}]", task.id, task.title, task.status);
        }
    }
}
