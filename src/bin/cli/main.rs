mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "revision-cli", about = "Spaced repetition revision flows", version)]
struct Cli {
    /// Flow snapshot file (default: from config, else the user data directory)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Config file (default: <config dir>/revision/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task to the flow
    Add {
        /// Task name
        name: String,
        /// Task that must be reviewed first (repeatable)
        #[arg(long = "after")]
        after: Vec<String>,
    },

    /// List tasks available for review now
    Available,

    /// Record a review of a task
    Review {
        /// Task name
        name: String,
        /// Quality 0-5, or very_hard / hard / medium / easy / very_easy
        rating: String,
    },

    /// Run an interactive, time-boxed review session
    Session {
        /// Session length (default: from config)
        #[arg(long)]
        minutes: Option<u32>,
    },

    /// Show all tasks, or one task in detail
    Show {
        /// Task name
        name: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.config.as_deref(), cli.state)?;

    match cli.command {
        Command::Add { name, after } => {
            commands::add::run(&mut app, &name, after, &cli.format, use_color)?;
        }
        Command::Available => {
            commands::available::run(&app, &cli.format, use_color)?;
        }
        Command::Review { name, rating } => {
            commands::review::run(&mut app, &name, &rating, &cli.format, use_color)?;
        }
        Command::Session { minutes } => {
            commands::session::run(&mut app, minutes, use_color)?;
        }
        Command::Show { name } => {
            commands::show::run(&app, name.as_deref(), &cli.format, use_color)?;
        }
    }

    Ok(())
}
