use anyhow::Result;
use chrono::Utc;

use crate::app::App;
use crate::render::terminal::{task_json, task_line};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let now = Utc::now();
    let available = app.flow.available_tasks_at(now);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> =
                available.iter().map(|t| task_json(t, true)).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if available.is_empty() {
                println!("Nothing to review right now.");
                return Ok(());
            }
            for task in available {
                println!("{}", task_line(task, true, now, use_color));
            }
        }
    }

    Ok(())
}
