use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::model::{DependencyKind, Task};

/// One directed edge in the dependency graph, predecessor → successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepEdge {
    pub from: Uuid,
    pub to: Uuid,
    pub kind: DependencyKind,
    pub lag_days: i64,
}

/// Directed predecessor graph over a task collection.
///
/// Built once per recomputation pass and borrowed by layout, critical-path,
/// routing, and reschedule. Declared links whose predecessor id names no
/// task in the set are recorded as dangling and excluded from the edges, so
/// downstream consumers never see them.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Uuid>,
    incoming: HashMap<Uuid, Vec<DepEdge>>,
    outgoing: HashMap<Uuid, Vec<DepEdge>>,
    dangling: Vec<(Uuid, Uuid)>,
}

impl DependencyGraph {
    /// Build the graph from each task's declared predecessors.
    pub fn build(tasks: &[Task]) -> Self {
        let known: HashSet<Uuid> = tasks.iter().map(|t| t.id).collect();
        let mut graph = Self {
            nodes: tasks.iter().map(|t| t.id).collect(),
            ..Default::default()
        };

        for task in tasks {
            for link in &task.predecessors {
                if !known.contains(&link.id) {
                    warn!(task = %task.id, predecessor = %link.id, "dangling predecessor reference");
                    graph.dangling.push((task.id, link.id));
                    continue;
                }
                let edge = DepEdge {
                    from: link.id,
                    to: task.id,
                    kind: link.kind,
                    lag_days: link.lag_days,
                };
                graph.incoming.entry(task.id).or_default().push(edge);
                graph.outgoing.entry(link.id).or_default().push(edge);
            }
        }
        graph
    }

    /// Every task id the graph was built from, in input order.
    pub fn nodes(&self) -> &[Uuid] {
        &self.nodes
    }

    /// Edges into `id` (its predecessors). Empty for unknown ids.
    pub fn predecessors_of(&self, id: Uuid) -> &[DepEdge] {
        self.incoming.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges out of `id` (its successors). Empty for unknown ids.
    pub fn successors_of(&self, id: Uuid) -> &[DepEdge] {
        self.outgoing.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges, grouped by predecessor in node order.
    pub fn edges(&self) -> impl Iterator<Item = &DepEdge> {
        self.nodes
            .iter()
            .filter_map(|id| self.outgoing.get(id))
            .flatten()
    }

    /// Declared links whose predecessor id matched no task:
    /// `(declaring task, missing predecessor)`.
    pub fn dangling(&self) -> &[(Uuid, Uuid)] {
        &self.dangling
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.nodes.contains(&id)
    }

    /// Kahn's algorithm. Returns every task exactly once with predecessors
    /// ahead of their successors, or `CyclicDependency` carrying the tasks
    /// left over after zero-indegree elimination (the cycle members and
    /// everything downstream of them).
    pub fn topological_order(&self) -> Result<Vec<Uuid>, ScheduleError> {
        let mut indegree: HashMap<Uuid, usize> = self
            .nodes
            .iter()
            .map(|&id| (id, self.predecessors_of(id).len()))
            .collect();

        let mut queue: VecDeque<Uuid> = self
            .nodes
            .iter()
            .copied()
            .filter(|&id| indegree[&id] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = queue.pop_front() {
            order.push(id);
            for edge in self.successors_of(id) {
                if let Some(remaining) = indegree.get_mut(&edge.to) {
                    *remaining -= 1;
                    if *remaining == 0 {
                        queue.push_back(edge.to);
                    }
                }
            }
        }

        if order.len() < self.nodes.len() {
            let mut ids: Vec<Uuid> = self
                .nodes
                .iter()
                .copied()
                .filter(|id| indegree[id] > 0)
                .collect();
            ids.sort();
            return Err(ScheduleError::CyclicDependency { ids });
        }
        Ok(order)
    }
}
