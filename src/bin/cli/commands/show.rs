use anyhow::{bail, Result};
use chrono::Utc;

use crate::app::App;
use crate::render::terminal::{paint, task_json, task_line, Color};
use crate::OutputFormat;
use revision_lib::scheduling::{format_interval, preview_intervals};

pub fn run(app: &App, name: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let now = Utc::now();
    let available: Vec<&str> = app
        .flow
        .available_tasks_at(now)
        .into_iter()
        .map(|t| t.name.as_str())
        .collect();

    let Some(name) = name else {
        match format {
            OutputFormat::Json => {
                let output: Vec<serde_json::Value> = app
                    .flow
                    .tasks()
                    .iter()
                    .map(|t| task_json(t, available.contains(&t.name.as_str())))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Plain => {
                if app.flow.is_empty() {
                    println!("No tasks yet. Add one with `revision-cli add <name>`.");
                    return Ok(());
                }
                for task in app.flow.tasks() {
                    let is_available = available.contains(&task.name.as_str());
                    println!("{}", task_line(task, is_available, now, use_color));
                }
            }
        }
        return Ok(());
    };

    let Some(task) = app.flow.task(name) else {
        bail!("No task named '{}'", name);
    };
    let is_available = available.contains(&name);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&task_json(task, is_available))?);
        }
        OutputFormat::Plain => {
            println!("{}", task_line(task, is_available, now, use_color));
            println!("  ease factor {:.2}, streak {}", task.review.ease_factor, task.review.streak);
            let preview: Vec<String> = preview_intervals(&task.review)
                .iter()
                .map(|(d, interval)| format!("{} {}", d.as_str(), format_interval(*interval)))
                .collect();
            println!("  {}", paint(&preview.join(" | "), Color::DIM, use_color));
        }
    }

    Ok(())
}
