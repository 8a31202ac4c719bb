use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    name: &str,
    after: Vec<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    app.flow
        .add_task(name, after)
        .with_context(|| format!("Failed to add task '{}'", name))?;
    app.save()?;

    match format {
        OutputFormat::Json => {
            let task = app.flow.task(name).context("Task missing after add")?;
            println!("{}", serde_json::to_string_pretty(task)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} {} ({} tasks in flow)",
                paint("Added", Color::GREEN, use_color),
                name,
                app.flow.len()
            );
        }
    }

    Ok(())
}
