//! Dependency graph checks over a task list

use std::collections::{HashMap, HashSet};

use super::models::RevisionTask;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// First `(task, dependency)` pair whose dependency is not in `tasks`
pub fn find_missing_dependency(tasks: &[RevisionTask]) -> Option<(&str, &str)> {
    let names: HashSet<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    tasks.iter().find_map(|task| {
        task.dependencies
            .iter()
            .find(|dep| !names.contains(dep.as_str()))
            .map(|dep| (task.name.as_str(), dep.as_str()))
    })
}

/// Find a dependency cycle, returned as the path of task names that closes
/// on itself (e.g. `["a", "b", "a"]`). Dependencies naming absent tasks are
/// ignored here.
pub fn find_cycle(tasks: &[RevisionTask]) -> Option<Vec<String>> {
    let index: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();
    let mut marks = vec![Mark::Unvisited; tasks.len()];

    for start in 0..tasks.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        // Iterative DFS; each frame is (task index, next dependency position)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::InProgress;

        while let Some(frame) = stack.last_mut() {
            let (node, pos) = *frame;
            let Some(dep) = tasks[node].dependencies.get(pos) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let Some(&dep_idx) = index.get(dep.as_str()) else {
                continue;
            };

            match marks[dep_idx] {
                Mark::Unvisited => {
                    marks[dep_idx] = Mark::InProgress;
                    stack.push((dep_idx, 0));
                }
                Mark::InProgress => {
                    let from = stack.iter().position(|(n, _)| *n == dep_idx).unwrap_or(0);
                    let mut cycle: Vec<String> = stack[from..]
                        .iter()
                        .map(|(n, _)| tasks[*n].name.clone())
                        .collect();
                    cycle.push(tasks[dep_idx].name.clone());
                    return Some(cycle);
                }
                Mark::Done => {}
            }
        }
    }

    None
}
