//! Scheduler error types

use thiserror::Error;

/// Errors surfaced by the card and task schedulers.
///
/// Every variant is local to a single call; the scheduler instance stays
/// usable after any of them.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Item already exists: {0}")]
    DuplicateItem(String),

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Invalid quality {0}: expected a rating between 0 and 5")]
    InvalidQuality(i32),

    #[error("Corrupt scheduler state: {0}")]
    CorruptState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
