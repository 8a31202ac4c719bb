//! Review scheduling core shared by flashcards and revision flows
//!
//! This module provides:
//! - The adaptive interval rule (simplified SM-2)
//! - Quality ratings and the feedback buttons that produce them
//! - Per-item review state
//! - Scheduler error types

pub mod algorithm;
pub mod error;
pub mod models;

pub use algorithm::{
    compute_next_interval, format_interval, preview_intervals, schedule_review, Difficulty,
    Quality, QualityPolicy, ReviewResult, MAX_INTERVAL_DAYS,
};
pub use error::{Result, SchedulerError};
pub use models::{ReviewState, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR};
