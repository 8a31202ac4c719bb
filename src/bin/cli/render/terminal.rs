use chrono::{DateTime, Utc};

use revision_lib::revision_flow::RevisionTask;
use revision_lib::scheduling::format_interval;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// Wrap `text` in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// "now", "new", or the time left until the task is due
pub fn due_label(task: &RevisionTask, now: DateTime<Utc>) -> String {
    match task.next_due() {
        None => "new".to_string(),
        Some(due) if due <= now => "now".to_string(),
        Some(due) => format!("in {}", format_interval(due - now)),
    }
}

/// One summary line for a task
pub fn task_line(task: &RevisionTask, available: bool, now: DateTime<Utc>, use_color: bool) -> String {
    let marker = if available {
        paint("●", Color::GREEN, use_color)
    } else if task.completed {
        paint("○", Color::DIM, use_color)
    } else {
        paint("·", Color::DIM, use_color)
    };

    let mut line = format!(
        "{} {}  {}",
        marker,
        paint(&task.name, Color::BOLD, use_color),
        due_label(task, now)
    );
    if !task.dependencies.is_empty() {
        line.push_str(&paint(
            &format!("  (after {})", task.dependencies.join(", ")),
            Color::DIM,
            use_color,
        ));
    }
    line
}

/// JSON view of a task for `--format json`
pub fn task_json(task: &RevisionTask, available: bool) -> serde_json::Value {
    serde_json::json!({
        "name": task.name,
        "dependencies": task.dependencies,
        "completed": task.completed,
        "available": available,
        "nextDue": task.next_due().map(|d| d.to_rfc3339()),
        "easeFactor": task.review.ease_factor,
        "streak": task.review.streak,
    })
}
