//! Data models for the flashcard scheduler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scheduling::ReviewState;

/// A flashcard with question and answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    /// Spaced repetition state, stored inline with the card
    #[serde(flatten)]
    pub review: ReviewState,
}

impl Flashcard {
    pub fn new(question: String, answer: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question,
            answer,
            created_at,
            review: ReviewState::default(),
        }
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.review.next_due
    }

    /// Check if the card is due for review at `now`
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.review.is_due_at(now)
    }
}

/// Cards split by whether they can be reviewed right now
#[derive(Debug, Clone, Default)]
pub struct DueSplit<'a> {
    /// Due or never scheduled, in collection order
    pub due_now: Vec<&'a Flashcard>,
    /// Scheduled for later, soonest first
    pub due_later: Vec<&'a Flashcard>,
}

/// Review statistics for a collection of cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub due_now: usize,
    pub due_later: usize,
}
