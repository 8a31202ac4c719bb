use anyhow::{Context, Result};
use chrono::Utc;

use crate::app::App;
use crate::render::terminal::{due_label, paint, task_json, Color};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    name: &str,
    rating: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let quality = app.parse_rating(rating)?;
    let task = app
        .flow
        .mark_completed(name, quality)
        .with_context(|| format!("Failed to review task '{}'", name))?;
    app.save()?;

    match format {
        OutputFormat::Json => {
            let available = app
                .flow
                .available_tasks()
                .iter()
                .any(|t| t.name == task.name);
            println!("{}", serde_json::to_string_pretty(&task_json(&task, available))?);
        }
        OutputFormat::Plain => {
            let color = if quality.is_success() { Color::GREEN } else { Color::YELLOW };
            println!(
                "{} {}: next review {}",
                paint(&format!("[{}]", quality), color, use_color),
                task.name,
                due_label(&task, Utc::now())
            );
        }
    }

    Ok(())
}
