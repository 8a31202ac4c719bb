//! Simplified SM-2 interval rule
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! A rating of 3 or more counts as a success. Successes schedule the item
//! 1 day out, then 3 days, then `streak * ease_factor` days; a failure
//! brings it back in 30 minutes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::{Result, SchedulerError};
use super::models::{ReviewState, MIN_EASE_FACTOR};

/// Lowest quality that counts as a successful recall
pub const SUCCESS_THRESHOLD: i32 = 3;

/// Highest quality rating
pub const MAX_QUALITY: i32 = 5;

/// Ease factor gained on each success
const EASE_STEP_UP: f64 = 0.1;

/// Ease factor lost on each failure
const EASE_STEP_DOWN: f64 = 0.2;

/// Delay before a failed item comes back
const RELEARN_MINUTES: i64 = 30;

/// Longest interval a success can produce, roughly a century
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// A validated recall quality in `0..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(i32);

impl Quality {
    /// Accept a rating, rejecting anything outside `0..=5`
    pub fn new(value: i32) -> Result<Self> {
        if (0..=MAX_QUALITY).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SchedulerError::InvalidQuality(value))
        }
    }

    /// Accept any rating, clamping it into `0..=5`
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(0, MAX_QUALITY))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 >= SUCCESS_THRESHOLD
    }
}

impl TryFrom<i32> for Quality {
    type Error = SchedulerError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How raw ratings from a host are turned into a [`Quality`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPolicy {
    /// Out-of-range ratings fail with `InvalidQuality`
    #[default]
    Reject,
    /// Out-of-range ratings are clamped into `0..=5`
    Clamp,
}

impl QualityPolicy {
    pub fn apply(self, raw: i32) -> Result<Quality> {
        match self {
            Self::Reject => Quality::new(raw),
            Self::Clamp => Ok(Quality::clamped(raw)),
        }
    }
}

/// The five feedback buttons offered after revealing an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    VeryHard,
    Hard,
    Medium,
    Easy,
    VeryEasy,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryHard,
        Difficulty::Hard,
        Difficulty::Medium,
        Difficulty::Easy,
        Difficulty::VeryEasy,
    ];

    /// Quality submitted by each button (1 through 5)
    pub fn quality(self) -> Quality {
        match self {
            Self::VeryHard => Quality(1),
            Self::Hard => Quality(2),
            Self::Medium => Quality(3),
            Self::Easy => Quality(4),
            Self::VeryEasy => Quality(5),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryHard => "very_hard",
            Self::Hard => "hard",
            Self::Medium => "medium",
            Self::Easy => "easy",
            Self::VeryEasy => "very_easy",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| format!("Unknown difficulty '{}'", s))
    }
}

/// Outcome of applying one review to an item
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub state: ReviewState,
    pub interval: Duration,
}

/// Compute the updated ease factor and streak plus the delay until the next
/// review. `next_due` on the returned state is left as it was.
///
/// Intervals are capped at [`MAX_INTERVAL_DAYS`], so a loaded state with a
/// huge streak or ease factor still schedules.
pub fn compute_next_interval(state: &ReviewState, quality: Quality) -> (ReviewState, Duration) {
    let mut next = state.clone();

    let interval = if quality.is_success() {
        let interval = match state.streak {
            0 => Duration::days(1),
            1 => Duration::days(3),
            streak => {
                let days = (f64::from(streak) * state.ease_factor).floor();
                Duration::days(days.min(MAX_INTERVAL_DAYS as f64) as i64)
            }
        };
        next.streak = state.streak.saturating_add(1);
        next.ease_factor = state.ease_factor + EASE_STEP_UP;
        interval
    } else {
        next.streak = 0;
        next.ease_factor = (state.ease_factor - EASE_STEP_DOWN).max(MIN_EASE_FACTOR);
        Duration::minutes(RELEARN_MINUTES)
    };

    (next, interval)
}

/// Apply a review at `now`, producing the new state with `next_due` set.
/// A due date past the representable range saturates at `MAX_UTC`.
pub fn schedule_review(state: &ReviewState, quality: Quality, now: DateTime<Utc>) -> ReviewResult {
    let (mut next, interval) = compute_next_interval(state, quality);
    let due = now
        .checked_add_signed(interval)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    next.next_due = Some(due);
    ReviewResult {
        state: next,
        interval,
    }
}

/// Interval each feedback button would produce from `state`
pub fn preview_intervals(state: &ReviewState) -> [(Difficulty, Duration); 5] {
    Difficulty::ALL.map(|d| (d, compute_next_interval(state, d.quality()).1))
}

/// Format an interval as a compact human-readable string
pub fn format_interval(interval: Duration) -> String {
    let minutes = interval.num_minutes();
    if minutes <= 0 {
        return "now".to_string();
    }
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = interval.num_hours();
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = interval.num_days();
    if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
