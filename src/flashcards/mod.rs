//! Flashcard review scheduling
//!
//! This module provides:
//! - Flashcard records carrying their spaced repetition state
//! - Review recording against a deck's card collection
//! - Due-now / due-later classification and deck statistics

pub mod models;
pub mod scheduler;

pub use models::*;
pub use scheduler::{partition_by_dueness, CardScheduler};
