//! Revision flow: dependency-gated task scheduling with review sessions

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use super::models::{RevisionTask, SessionStatus};
use super::session::ReviewSession;
use super::snapshot;
use crate::clock::{Clock, SystemClock};
use crate::scheduling::{format_interval, schedule_review, Quality, Result, SchedulerError};

/// Owns the tasks of one flow plus at most one active session.
///
/// Tasks are kept in insertion order with a name index beside them. A task
/// only becomes available once every dependency has been reviewed at least
/// once and its own due time has passed.
#[derive(Debug, Clone)]
pub struct RevisionFlow<C: Clock = SystemClock> {
    tasks: Vec<RevisionTask>,
    index: HashMap<String, usize>,
    session: Option<ReviewSession>,
    clock: C,
}

impl RevisionFlow<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for RevisionFlow<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RevisionFlow<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            index: HashMap::new(),
            session: None,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[RevisionTask] {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&RevisionTask> {
        self.index.get(name).map(|&i| &self.tasks[i])
    }

    /// Register a task. Every dependency must already be registered, which
    /// also rules out cycles.
    pub fn add_task(&mut self, name: impl Into<String>, dependencies: Vec<String>) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(SchedulerError::DuplicateItem(name));
        }

        if let Some(dep) = dependencies.iter().find(|d| !self.index.contains_key(d.as_str())) {
            return Err(SchedulerError::UnknownDependency {
                task: name,
                dependency: dep.clone(),
            });
        }

        log::debug!("Adding task '{}' (dependencies: {:?})", name, dependencies);
        self.index.insert(name.clone(), self.tasks.len());
        self.tasks.push(RevisionTask::new(name, dependencies));
        Ok(())
    }

    fn dependencies_met(&self, task: &RevisionTask) -> bool {
        task.dependencies.iter().all(|dep| {
            self.index
                .get(dep)
                .is_some_and(|&i| self.tasks[i].completed)
        })
    }

    /// Tasks available right now, in insertion order
    pub fn available_tasks(&self) -> Vec<&RevisionTask> {
        self.available_tasks_at(self.clock.now())
    }

    /// Tasks whose dependencies are all completed and which are due at `now`
    pub fn available_tasks_at(&self, now: DateTime<Utc>) -> Vec<&RevisionTask> {
        self.tasks
            .iter()
            .filter(|task| task.is_due_at(now) && self.dependencies_met(task))
            .collect()
    }

    /// Record a review of `name`. Marks it completed for good and moves its
    /// due time forward. Returns the updated task for persistence.
    pub fn mark_completed(&mut self, name: &str, quality: Quality) -> Result<RevisionTask> {
        let now = self.clock.now();
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| SchedulerError::ItemNotFound(name.to_string()))?;

        let task = &mut self.tasks[i];
        let result = schedule_review(&task.review, quality, now);
        task.completed = true;
        task.review = result.state;

        log::info!(
            "Reviewed task '{}' with quality {}: streak {}, ease {:.2}, next due in {}",
            task.name,
            quality,
            task.review.streak,
            task.review.ease_factor,
            format_interval(result.interval)
        );

        Ok(task.clone())
    }

    /// Snapshot the currently available tasks into a new session lasting
    /// `duration`. Any previous session is dropped. Returns the queue size.
    pub fn start_session(&mut self, duration: Duration) -> usize {
        let now = self.clock.now();
        let queued: Vec<RevisionTask> = self.available_tasks_at(now).into_iter().cloned().collect();
        let count = queued.len();

        if self.session.as_ref().is_some_and(|s| s.remaining() > 0) {
            log::debug!("Discarding unfinished session");
        }
        let session = ReviewSession::new(queued, now, duration);
        log::info!("Started session with {} tasks, ends at {}", count, session.ends_at());
        self.session = Some(session);
        count
    }

    /// Draw the next task from the active session. `None` once the queue is
    /// empty, the window has closed, or no session was started.
    pub fn next_task(&mut self) -> Option<RevisionTask> {
        let now = self.clock.now();
        let session = self.session.as_mut()?;
        if session.is_expired(now) && session.remaining() > 0 {
            log::debug!("Session expired with {} tasks left", session.remaining());
        }
        session.next_task(now)
    }

    pub fn session_status(&self) -> Option<SessionStatus> {
        let now = self.clock.now();
        self.session.as_ref().map(|s| s.status(now))
    }

    /// Serialize every task to snapshot JSON. Sessions are not included.
    pub fn save_state(&self) -> Result<String> {
        snapshot::encode(&self.tasks)
    }

    /// Replace all tasks with those in `json` and drop any session. On error
    /// the current state is left untouched.
    pub fn load_state(&mut self, json: &str) -> Result<()> {
        let tasks = snapshot::decode(json)?;
        self.index = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        self.tasks = tasks;
        self.session = None;
        log::info!("Loaded revision flow with {} tasks", self.tasks.len());
        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let json = self.save_state()?;
        snapshot::write_file(path, &json)?;
        log::info!("Saved revision flow ({} tasks) to {:?}", self.tasks.len(), path);
        Ok(())
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<()> {
        let json = snapshot::read_file(path)?;
        self.load_state(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use crate::scheduling::{MAX_INTERVAL_DAYS, MIN_EASE_FACTOR};
    use proptest::prelude::*;

    fn q(value: i32) -> Quality {
        Quality::new(value).unwrap()
    }

    fn deps(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn names(tasks: &[&RevisionTask]) -> Vec<String> {
        tasks.iter().map(|t| t.name.clone()).collect()
    }

    fn math_flow() -> (RevisionFlow<FakeClock>, FakeClock) {
        let clock = FakeClock::new();
        let mut flow = RevisionFlow::with_clock(clock.clone());
        flow.add_task("algebra", Vec::new()).unwrap();
        flow.add_task("linear", deps(&["algebra"])).unwrap();
        flow.add_task("quadratic", deps(&["linear"])).unwrap();
        flow.add_task("systems", deps(&["linear"])).unwrap();
        (flow, clock)
    }

    #[test]
    fn test_dependency_unlocks_after_completion() {
        let clock = FakeClock::new();
        let mut flow = RevisionFlow::with_clock(clock.clone());
        flow.add_task("A", Vec::new()).unwrap();
        flow.add_task("B", deps(&["A"])).unwrap();

        assert_eq!(names(&flow.available_tasks()), vec!["A"]);

        let a = flow.mark_completed("A", q(5)).unwrap();
        assert!(a.completed);
        assert_eq!(a.next_due(), Some(clock.now() + Duration::days(1)));

        assert_eq!(names(&flow.available_tasks()), vec!["B"]);

        clock.advance(Duration::days(1));
        assert_eq!(names(&flow.available_tasks()), vec!["A", "B"]);
    }

    #[test]
    fn test_add_task_unknown_dependency() {
        let mut flow = RevisionFlow::new();
        let err = flow.add_task("B", deps(&["A"])).unwrap_err();
        match err {
            SchedulerError::UnknownDependency { task, dependency } => {
                assert_eq!(task, "B");
                assert_eq!(dependency, "A");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(flow.is_empty());
    }

    #[test]
    fn test_add_task_self_dependency_is_unknown() {
        let mut flow = RevisionFlow::new();
        let err = flow.add_task("A", deps(&["A"])).unwrap_err();
        assert!(matches!(err, SchedulerError::UnknownDependency { .. }));
    }

    #[test]
    fn test_add_task_duplicate() {
        let mut flow = RevisionFlow::new();
        flow.add_task("A", Vec::new()).unwrap();
        let err = flow.add_task("A", Vec::new()).unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateItem(name) if name == "A"));
        assert_eq!(flow.len(), 1);
    }

    #[test]
    fn test_mark_completed_unknown_task() {
        let (mut flow, _) = math_flow();
        let err = flow.mark_completed("geometry", q(4)).unwrap_err();
        assert!(matches!(err, SchedulerError::ItemNotFound(_)));
    }

    #[test]
    fn test_completed_is_sticky_after_failure() {
        let (mut flow, clock) = math_flow();
        flow.mark_completed("algebra", q(4)).unwrap();
        let algebra = flow.mark_completed("algebra", q(0)).unwrap();

        assert!(algebra.completed);
        assert_eq!(algebra.review.streak, 0);
        assert!(algebra.review.ease_factor >= MIN_EASE_FACTOR);
        assert_eq!(algebra.next_due(), Some(clock.now() + Duration::minutes(30)));

        // Dependents stay unlocked
        assert_eq!(names(&flow.available_tasks()), vec!["linear"]);
    }

    #[test]
    fn test_streak_progression() {
        let (mut flow, clock) = math_flow();
        let mut intervals = Vec::new();
        for _ in 0..3 {
            let before = clock.now();
            let task = flow.mark_completed("algebra", q(4)).unwrap();
            intervals.push(task.next_due().unwrap() - before);
            clock.advance(Duration::days(30));
        }
        assert_eq!(
            intervals,
            vec![Duration::days(1), Duration::days(3), Duration::days(5)]
        );
        assert_eq!(flow.task("algebra").unwrap().review.streak, 3);
    }

    #[test]
    fn test_session_drains_snapshot_in_order() {
        let clock = FakeClock::new();
        let mut flow = RevisionFlow::with_clock(clock.clone());
        for name in ["a", "b", "c"] {
            flow.add_task(name, Vec::new()).unwrap();
        }

        assert_eq!(flow.start_session(Duration::minutes(30)), 3);

        let mut drawn = Vec::new();
        while let Some(task) = flow.next_task() {
            // Reviewing mid-session does not disturb the queue
            flow.mark_completed(&task.name, q(4)).unwrap();
            drawn.push(task.name);
        }
        assert_eq!(drawn, vec!["a", "b", "c"]);
        assert!(flow.next_task().is_none());
        assert_eq!(flow.session_status().unwrap().remaining, 0);
    }

    #[test]
    fn test_session_ignores_tasks_added_later() {
        let (mut flow, _) = math_flow();
        assert_eq!(flow.start_session(Duration::minutes(30)), 1);
        flow.add_task("extra", Vec::new()).unwrap();

        assert_eq!(flow.next_task().map(|t| t.name), Some("algebra".to_string()));
        assert!(flow.next_task().is_none());
    }

    #[test]
    fn test_session_expires() {
        let clock = FakeClock::new();
        let mut flow = RevisionFlow::with_clock(clock.clone());
        flow.add_task("a", Vec::new()).unwrap();
        flow.add_task("b", Vec::new()).unwrap();

        flow.start_session(Duration::minutes(10));
        assert!(flow.next_task().is_some());

        clock.advance(Duration::minutes(11));
        assert!(flow.next_task().is_none());

        let status = flow.session_status().unwrap();
        assert!(status.expired);
        assert_eq!(status.remaining, 1);
    }

    #[test]
    fn test_new_session_replaces_old() {
        let clock = FakeClock::new();
        let mut flow = RevisionFlow::with_clock(clock.clone());
        flow.add_task("a", Vec::new()).unwrap();
        flow.add_task("b", Vec::new()).unwrap();

        flow.start_session(Duration::minutes(30));
        flow.next_task();
        flow.mark_completed("a", q(5)).unwrap();

        assert_eq!(flow.start_session(Duration::minutes(30)), 1);
        assert_eq!(flow.next_task().map(|t| t.name), Some("b".to_string()));
        assert!(flow.next_task().is_none());
    }

    #[test]
    fn test_next_task_without_session() {
        let (mut flow, _) = math_flow();
        assert!(flow.next_task().is_none());
        assert!(flow.session_status().is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (mut flow, clock) = math_flow();
        flow.mark_completed("algebra", q(5)).unwrap();
        flow.mark_completed("linear", q(2)).unwrap();
        flow.mark_completed("algebra", q(4)).unwrap();

        let json = flow.save_state().unwrap();
        let mut restored = RevisionFlow::with_clock(clock.clone());
        restored.load_state(&json).unwrap();

        assert_eq!(restored.tasks(), flow.tasks());
        assert_eq!(
            names(&restored.available_tasks()),
            names(&flow.available_tasks())
        );
    }

    #[test]
    fn test_review_of_huge_loaded_state_is_capped() {
        let clock = FakeClock::new();
        let mut flow = RevisionFlow::with_clock(clock.clone());
        flow.load_state(
            r#"{
                "big": {"completed": true, "next_due": null, "ease_factor": 600.0, "streak": 200000, "dependencies": []},
                "huge": {"completed": true, "next_due": null, "ease_factor": 1e12, "streak": 7, "dependencies": []}
            }"#,
        )
        .unwrap();

        let expected = Some(clock.now() + Duration::days(MAX_INTERVAL_DAYS));
        assert_eq!(flow.mark_completed("big", q(4)).unwrap().next_due(), expected);
        assert_eq!(flow.mark_completed("huge", q(5)).unwrap().next_due(), expected);
        assert_eq!(flow.task("big").unwrap().review.streak, 200_001);
    }

    #[test]
    fn test_start_session_with_huge_duration() {
        let (mut flow, clock) = math_flow();
        assert_eq!(flow.start_session(Duration::days(100_000_000)), 1);

        clock.advance(Duration::days(3650));
        let status = flow.session_status().unwrap();
        assert!(!status.expired);
        assert_eq!(flow.next_task().map(|t| t.name), Some("algebra".to_string()));
    }

    #[test]
    fn test_load_replaces_tasks_and_drops_session() {
        let (flow, clock) = math_flow();
        let json = flow.save_state().unwrap();

        let mut other = RevisionFlow::with_clock(clock);
        other.add_task("unrelated", Vec::new()).unwrap();
        other.start_session(Duration::minutes(30));

        other.load_state(&json).unwrap();
        assert_eq!(other.len(), 4);
        assert!(other.task("unrelated").is_none());
        assert!(other.session_status().is_none());
        assert!(other.next_task().is_none());

        // Index is rebuilt: lookups and new registrations see loaded names
        assert!(other.task("systems").is_some());
        assert!(matches!(
            other.add_task("algebra", Vec::new()),
            Err(SchedulerError::DuplicateItem(_))
        ));
    }

    #[test]
    fn test_corrupt_load_keeps_state() {
        let (mut flow, _) = math_flow();
        flow.mark_completed("algebra", q(4)).unwrap();
        flow.start_session(Duration::minutes(30));
        let before = flow.tasks().to_vec();

        let err = flow.load_state(r#"{"a": {"completed": 1}}"#).unwrap_err();
        assert!(matches!(err, SchedulerError::CorruptState(_)));
        assert_eq!(flow.tasks(), before.as_slice());
        assert!(flow.session_status().is_some());
    }

    #[test]
    fn test_path_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.json");
        let (mut flow, clock) = math_flow();
        flow.mark_completed("algebra", q(3)).unwrap();
        flow.save_to_path(&path).unwrap();

        let mut restored = RevisionFlow::with_clock(clock);
        restored.load_from_path(&path).unwrap();
        assert_eq!(restored.tasks(), flow.tasks());
    }

    /// Builds a random DAG: task `i` may only depend on tasks before it
    fn flow_strategy() -> impl Strategy<Value = Vec<(Vec<bool>, Option<i32>)>> {
        proptest::collection::vec(
            (
                proptest::collection::vec(any::<bool>(), 12),
                proptest::option::of(0i32..=5),
            ),
            1..12,
        )
    }

    proptest! {
        #[test]
        fn available_tasks_have_completed_dependencies(
            layout in flow_strategy(),
            hours in 0i64..200,
        ) {
            let clock = FakeClock::new();
            let mut flow = RevisionFlow::with_clock(clock.clone());

            for (i, (mask, _)) in layout.iter().enumerate() {
                let task_deps: Vec<String> = (0..i)
                    .filter(|&j| mask[j])
                    .map(|j| format!("t{}", j))
                    .collect();
                flow.add_task(format!("t{}", i), task_deps).unwrap();
            }
            for (i, (_, quality)) in layout.iter().enumerate() {
                if let Some(raw) = quality {
                    flow.mark_completed(&format!("t{}", i), q(*raw)).unwrap();
                }
            }
            clock.advance(Duration::hours(hours));

            let now = clock.now();
            let available = names(&flow.available_tasks());
            for task in flow.tasks() {
                let deps_done = task
                    .dependencies
                    .iter()
                    .all(|d| flow.task(d).map(|t| t.completed).unwrap_or(false));
                let expected = deps_done && task.is_due_at(now);
                prop_assert_eq!(available.contains(&task.name), expected);
            }
        }

        #[test]
        fn save_load_roundtrip_after_random_reviews(
            layout in flow_strategy(),
            reviews in proptest::collection::vec(
                proptest::collection::vec((0i32..=5, 0i64..=2880), 0..60),
                12,
            ),
        ) {
            let clock = FakeClock::new();
            let mut flow = RevisionFlow::with_clock(clock.clone());

            for (i, (mask, _)) in layout.iter().enumerate() {
                let task_deps: Vec<String> = (0..i)
                    .filter(|&j| mask[j])
                    .map(|j| format!("t{}", j))
                    .collect();
                flow.add_task(format!("t{}", i), task_deps).unwrap();
            }
            for (i, history) in reviews.iter().take(layout.len()).enumerate() {
                for &(raw, minutes) in history {
                    flow.mark_completed(&format!("t{}", i), q(raw)).unwrap();
                    clock.advance(Duration::minutes(minutes));
                }
            }

            let json = flow.save_state().unwrap();
            let mut restored = RevisionFlow::with_clock(clock.clone());
            restored.load_state(&json).unwrap();

            prop_assert_eq!(restored.tasks(), flow.tasks());
            prop_assert_eq!(
                names(&restored.available_tasks()),
                names(&flow.available_tasks())
            );
        }
    }
}
