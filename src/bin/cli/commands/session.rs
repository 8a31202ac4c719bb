use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::app::App;
use crate::render::terminal::{due_label, paint, Color};

/// Draw tasks one at a time and read a rating for each from stdin.
/// A blank line or end of input ends the session early.
pub fn run(app: &mut App, minutes: Option<u32>, use_color: bool) -> Result<()> {
    let duration = match minutes {
        Some(m) => Duration::minutes(i64::from(m)),
        None => app.config.session_duration(),
    };

    let queued = app.flow.start_session(duration);
    if queued == 0 {
        println!("Nothing to review right now.");
        return Ok(());
    }
    println!(
        "{} tasks queued, {} minutes on the clock.",
        queued,
        duration.num_minutes()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut reviewed = 0usize;

    'session: while let Some(task) = app.flow.next_task() {
        loop {
            print!("{} > ", paint(&task.name, Color::BOLD, use_color));
            io::stdout().flush()?;

            let Some(line) = lines.next().transpose()? else {
                break 'session;
            };
            let line = line.trim();
            if line.is_empty() {
                break 'session;
            }

            match app.parse_rating(line) {
                Ok(quality) => {
                    let updated = app.flow.mark_completed(&task.name, quality)?;
                    reviewed += 1;
                    println!("  next review {}", due_label(&updated, Utc::now()));
                    break;
                }
                Err(e) => {
                    println!("  {}", paint(&e.to_string(), Color::RED, use_color));
                }
            }
        }
    }

    if let Some(status) = app.flow.session_status() {
        if status.expired && status.remaining > 0 {
            println!("Time is up, {} tasks left for next time.", status.remaining);
        }
    }

    app.save()?;
    println!("Reviewed {} of {} tasks.", reviewed, queued);
    Ok(())
}
