//! Time-boxed review sessions
//!
//! A session is a single-pass queue over the tasks that were available when
//! it started. Later changes to the flow do not reach the queue.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use super::models::{RevisionTask, SessionStatus};

/// Default session length
pub const DEFAULT_SESSION_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct ReviewSession {
    queue: VecDeque<RevisionTask>,
    started_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl ReviewSession {
    /// Open a session over `tasks`. An end past the representable range
    /// saturates at `MAX_UTC` (or `MIN_UTC` for a negative duration).
    pub fn new(tasks: Vec<RevisionTask>, started_at: DateTime<Utc>, duration: Duration) -> Self {
        let ends_at = match started_at.checked_add_signed(duration) {
            Some(ends_at) => ends_at,
            None if duration < Duration::zero() => DateTime::<Utc>::MIN_UTC,
            None => DateTime::<Utc>::MAX_UTC,
        };
        Self {
            queue: tasks.into(),
            started_at,
            ends_at,
        }
    }

    /// Remove and return the head of the queue, unless the window closed
    pub fn next_task(&mut self, now: DateTime<Utc>) -> Option<RevisionTask> {
        if self.is_expired(now) {
            return None;
        }
        self.queue.pop_front()
    }

    /// Expiry is strict: a draw exactly at `ends_at` still succeeds
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.ends_at
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn status(&self, now: DateTime<Utc>) -> SessionStatus {
        SessionStatus {
            remaining: self.queue.len(),
            started_at: self.started_at,
            ends_at: self.ends_at,
            expired: self.is_expired(now),
        }
    }
}
