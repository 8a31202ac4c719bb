//! Snapshot format for revision flows
//!
//! A snapshot is a JSON object keyed by task name:
//!
//! ```json
//! {
//!   "algebra": {
//!     "completed": true,
//!     "next_due": "2026-03-02T09:00:00Z",
//!     "ease_factor": 2.6,
//!     "streak": 1,
//!     "dependencies": []
//!   }
//! }
//! ```
//!
//! Keys are written in task insertion order and read back in document order,
//! so availability order survives a round-trip.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::graph::{find_cycle, find_missing_dependency};
use super::models::RevisionTask;
use crate::scheduling::{Result, ReviewState, SchedulerError, MIN_EASE_FACTOR};

/// Persisted fields of a single task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TaskEntry {
    completed: bool,
    next_due: Option<DateTime<Utc>>,
    ease_factor: f64,
    streak: u32,
    dependencies: Vec<String>,
}

/// Ordered task map as it appears on disk
#[derive(Debug, Default)]
struct FlowSnapshot {
    entries: Vec<(String, TaskEntry)>,
}

impl Serialize for FlowSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

struct FlowSnapshotVisitor;

impl<'de> Visitor<'de> for FlowSnapshotVisitor {
    type Value = FlowSnapshot;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of task name to task state")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FlowSnapshot, A::Error> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, entry)) = access.next_entry::<String, TaskEntry>()? {
            if !seen.insert(name.clone()) {
                return Err(de::Error::custom(format!("duplicate task '{}'", name)));
            }
            entries.push((name, entry));
        }
        Ok(FlowSnapshot { entries })
    }
}

impl<'de> Deserialize<'de> for FlowSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FlowSnapshotVisitor)
    }
}

/// Serialize tasks, in order, to snapshot JSON
pub fn encode(tasks: &[RevisionTask]) -> Result<String> {
    let snapshot = FlowSnapshot {
        entries: tasks
            .iter()
            .map(|task| {
                let entry = TaskEntry {
                    completed: task.completed,
                    next_due: task.review.next_due,
                    ease_factor: task.review.ease_factor,
                    streak: task.review.streak,
                    dependencies: task.dependencies.clone(),
                };
                (task.name.clone(), entry)
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Parse and validate snapshot JSON.
///
/// Fails with `CorruptState` on malformed JSON, missing fields, duplicate
/// names, an ease factor under the floor, dangling dependencies, or a cycle.
pub fn decode(json: &str) -> Result<Vec<RevisionTask>> {
    let snapshot: FlowSnapshot =
        serde_json::from_str(json).map_err(|e| SchedulerError::CorruptState(e.to_string()))?;

    let mut tasks = Vec::with_capacity(snapshot.entries.len());
    for (name, entry) in snapshot.entries {
        if !entry.ease_factor.is_finite() || entry.ease_factor < MIN_EASE_FACTOR {
            return Err(SchedulerError::CorruptState(format!(
                "task '{}' has ease factor {} below {}",
                name, entry.ease_factor, MIN_EASE_FACTOR
            )));
        }
        tasks.push(RevisionTask {
            name,
            dependencies: entry.dependencies,
            completed: entry.completed,
            review: ReviewState {
                ease_factor: entry.ease_factor,
                streak: entry.streak,
                next_due: entry.next_due,
            },
        });
    }

    if let Some((task, dependency)) = find_missing_dependency(&tasks) {
        return Err(SchedulerError::CorruptState(format!(
            "task '{}' depends on unknown task '{}'",
            task, dependency
        )));
    }

    if let Some(cycle) = find_cycle(&tasks) {
        return Err(SchedulerError::CorruptState(format!(
            "dependency cycle: {}",
            cycle.join(" -> ")
        )));
    }

    Ok(tasks)
}

pub fn write_file(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;
    Ok(())
}

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}
