//! Review scheduling for flashcards and dependency-ordered revision flows
//!
//! Schedulers are plain owned values, one per deck or flow. They never touch
//! storage themselves: hosts hand them records, call the review operations,
//! and persist what comes back. Hosts sharing a scheduler across threads
//! wrap it in a `Mutex` and take the lock for every call.

pub mod clock;
pub mod config;
pub mod flashcards;
pub mod revision_flow;
pub mod scheduling;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, RevisionConfig};
pub use flashcards::{CardScheduler, Flashcard};
pub use revision_flow::{RevisionFlow, RevisionTask};
pub use scheduling::{Difficulty, Quality, QualityPolicy, ReviewState, SchedulerError};
