//! Data models for revision flows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduling::ReviewState;

/// A named unit of study that may depend on other tasks in the same flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionTask {
    pub name: String,
    /// Tasks that must have been reviewed at least once before this one
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Set by the first review and never cleared
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub review: ReviewState,
}

impl RevisionTask {
    pub fn new(name: String, dependencies: Vec<String>) -> Self {
        Self {
            name,
            dependencies,
            completed: false,
            review: ReviewState::default(),
        }
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.review.next_due
    }

    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.review.is_due_at(now)
    }
}

/// Progress of the active review session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Tasks still queued
    pub remaining: usize,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// The window has closed; nothing more will be drawn
    pub expired: bool,
}
