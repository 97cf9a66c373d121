use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;

/// What happens to a deleted task's descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Remove the task and every descendant beneath it.
    Cascade,
    /// Remove only the task; its children attach to its parent.
    ReparentChildren,
}

/// A project containing tasks and metadata.
///
/// Tasks are looked up by id, never by position; the collection order is
/// only the input order used as a sibling tiebreak by the hierarchy builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<Task>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            tasks: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
        self.touch();
    }

    /// Remove a task under the given policy.
    ///
    /// Predecessor links pointing at any removed task are stripped from the
    /// survivors so the dependency graph never sees ids this call deleted.
    /// Returns the number of tasks removed; 0 if `id` is unknown.
    pub fn remove_task(&mut self, id: Uuid, policy: RemovalPolicy) -> usize {
        let Some(target) = self.task(id) else {
            return 0;
        };
        let parent_of_removed = target.parent_id;

        let mut doomed: HashSet<Uuid> = HashSet::new();
        doomed.insert(id);
        match policy {
            RemovalPolicy::Cascade => {
                // Sweep until no task's parent chain reaches the doomed set.
                loop {
                    let mut grew = false;
                    for task in &self.tasks {
                        if !doomed.contains(&task.id)
                            && task.parent_id.is_some_and(|p| doomed.contains(&p))
                        {
                            doomed.insert(task.id);
                            grew = true;
                        }
                    }
                    if !grew {
                        break;
                    }
                }
            }
            RemovalPolicy::ReparentChildren => {
                for task in &mut self.tasks {
                    if task.parent_id == Some(id) {
                        task.parent_id = parent_of_removed;
                    }
                }
            }
        }

        let before = self.tasks.len();
        self.tasks.retain(|t| !doomed.contains(&t.id));
        for task in &mut self.tasks {
            task.predecessors.retain(|link| !doomed.contains(&link.id));
        }
        self.touch();
        before - self.tasks.len()
    }
}
