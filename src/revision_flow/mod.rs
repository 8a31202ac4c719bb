//! Dependency-aware revision flows
//!
//! This module provides:
//! - Named tasks with prerequisite tasks and per-task review state
//! - Availability filtering (dependencies reviewed, task due)
//! - Time-boxed single-pass review sessions
//! - Snapshot save/load with validation

pub mod flow;
pub mod graph;
pub mod models;
pub mod session;
pub mod snapshot;

pub use flow::RevisionFlow;
pub use models::{RevisionTask, SessionStatus};
pub use session::{ReviewSession, DEFAULT_SESSION_MINUTES};
