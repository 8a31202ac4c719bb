//! Card scheduler: review recording and due-ness classification for a deck
//!
//! The scheduler owns the in-memory card collection for one deck. It never
//! touches storage; hosts load cards, hand them over, and persist whatever
//! `record_review` returns.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::models::{DueSplit, Flashcard, ReviewStats};
use crate::clock::{Clock, SystemClock};
use crate::scheduling::{preview_intervals, schedule_review, Difficulty, Quality, Result, SchedulerError};

/// Split `cards` into those due at `now` and those scheduled later.
///
/// `due_now` keeps collection order. `due_later` is sorted by due time, with
/// ties broken by card id.
pub fn partition_by_dueness(cards: &[Flashcard], now: DateTime<Utc>) -> DueSplit<'_> {
    let (due_now, mut due_later): (Vec<&Flashcard>, Vec<&Flashcard>) =
        cards.iter().partition(|card| card.is_due_at(now));

    due_later.sort_by(|a, b| a.next_due().cmp(&b.next_due()).then_with(|| a.id.cmp(&b.id)));

    DueSplit { due_now, due_later }
}

/// Scheduler for a flat collection of flashcards
#[derive(Debug, Clone)]
pub struct CardScheduler<C: Clock = SystemClock> {
    cards: Vec<Flashcard>,
    clock: C,
}

impl CardScheduler<SystemClock> {
    pub fn new(cards: Vec<Flashcard>) -> Result<Self> {
        Self::with_clock(cards, SystemClock)
    }
}

impl<C: Clock> CardScheduler<C> {
    /// Take ownership of a deck. Fails with `DuplicateItem` if two cards
    /// share an id.
    pub fn with_clock(cards: Vec<Flashcard>, clock: C) -> Result<Self> {
        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(card) = cards.iter().find(|c| !seen.insert(c.id)) {
            return Err(SchedulerError::DuplicateItem(card.id.to_string()));
        }
        Ok(Self { cards, clock })
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Flashcard> {
        self.cards
    }

    pub fn card(&self, card_id: Uuid) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    /// Create a card with fresh review state and add it to the collection
    pub fn add_card(&mut self, question: String, answer: String) -> &Flashcard {
        let card = Flashcard::new(question, answer, self.clock.now());
        log::debug!("Added card {}", card.id);
        let index = self.cards.len();
        self.cards.push(card);
        &self.cards[index]
    }

    /// Apply a review to a card and return the updated card for persistence
    pub fn record_review(&mut self, card_id: Uuid, quality: Quality) -> Result<Flashcard> {
        let now = self.clock.now();
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(|| SchedulerError::ItemNotFound(card_id.to_string()))?;

        let result = schedule_review(&card.review, quality, now);
        card.review = result.state;

        log::info!(
            "Reviewed card {} with quality {}: streak {}, next due {:?}",
            card.id,
            quality,
            card.review.streak,
            card.review.next_due
        );

        Ok(card.clone())
    }

    /// Classify the collection against the clock's current time
    pub fn partition_by_dueness(&self) -> DueSplit<'_> {
        partition_by_dueness(&self.cards, self.clock.now())
    }

    pub fn review_stats(&self) -> ReviewStats {
        self.review_stats_at(self.clock.now())
    }

    /// Collection counts with due-ness judged at `now`
    pub fn review_stats_at(&self, now: DateTime<Utc>) -> ReviewStats {
        let split = partition_by_dueness(&self.cards, now);
        ReviewStats {
            total_cards: self.cards.len(),
            new_cards: self.cards.iter().filter(|c| c.review.is_new()).count(),
            due_now: split.due_now.len(),
            due_later: split.due_later.len(),
        }
    }

    /// Interval each feedback button would give the card
    pub fn preview(&self, card_id: Uuid) -> Result<[(Difficulty, Duration); 5]> {
        let card = self
            .card(card_id)
            .ok_or_else(|| SchedulerError::ItemNotFound(card_id.to_string()))?;
        Ok(preview_intervals(&card.review))
    }
}
