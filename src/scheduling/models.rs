//! Adaptive review state shared by cards and tasks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ease factor given to every newly created item
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Ease factor never drops below this
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Spaced repetition state carried by every reviewable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Multiplier controlling interval growth
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Consecutive successful reviews
    #[serde(default)]
    pub streak: u32,
    /// Not offered for review before this instant; `None` means due now
    #[serde(default)]
    pub next_due: Option<DateTime<Utc>>,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            streak: 0,
            next_due: None,
        }
    }
}

impl ReviewState {
    /// Whether the item may be reviewed at `now`
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) => due <= now,
            None => true,
        }
    }

    /// Whether the item has never been scheduled
    pub fn is_new(&self) -> bool {
        self.next_due.is_none()
    }
}
