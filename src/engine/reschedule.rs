use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::engine::graph::{DepEdge, DependencyGraph};
use crate::error::ScheduleError;
use crate::model::{DependencyKind, Task};

/// How `reschedule` treats predecessor constraints on the moved task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RescheduleMode {
    /// Reject a move that would start the task before its predecessors
    /// allow.
    #[default]
    Strict,
    /// Accept the move anyway and repair dependents. This is the "move it
    /// and shift everything downstream" gesture.
    Override,
}

/// Move one task to a new start date, preserving its duration.
///
/// Returns the full task set with updated dates; the input is never
/// mutated. Dependents that would now start earlier than the moved task
/// allows are shifted forward by exactly the colliding amount, transitively
/// through their own successors. Moving a task earlier never pulls
/// dependents back with it — existing slack is left alone.
///
/// In `Strict` mode, a start date the task's own predecessors forbid fails
/// with `DependencyViolation` naming the conflicting predecessors.
pub fn reschedule(
    tasks: &[Task],
    graph: &DependencyGraph,
    task_id: Uuid,
    new_start: NaiveDate,
    mode: RescheduleMode,
) -> Result<Vec<Task>, ScheduleError> {
    // Also catches dependency cycles before any date moves.
    let order = graph.topological_order()?;

    let index_of: HashMap<Uuid, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id, i))
        .collect();
    let Some(&moved_index) = index_of.get(&task_id) else {
        return Err(ScheduleError::DanglingReference { id: task_id });
    };

    let delta = (new_start - tasks[moved_index].start).num_days();
    if delta == 0 {
        return Ok(tasks.to_vec());
    }

    if mode == RescheduleMode::Strict {
        let duration = tasks[moved_index].duration_days().max(1);
        let conflicts: Vec<Uuid> = graph
            .predecessors_of(task_id)
            .iter()
            .filter(|edge| {
                index_of.get(&edge.from).is_some_and(|&i| {
                    new_start < implied_min_start(edge, &tasks[i], duration)
                })
            })
            .map(|edge| edge.from)
            .collect();
        if !conflicts.is_empty() {
            return Err(ScheduleError::DependencyViolation {
                id: task_id,
                conflicts,
            });
        }
    }

    let mut updated = tasks.to_vec();
    updated[moved_index].shift_days(delta);
    debug!(task = %task_id, delta, "rescheduled");

    // Forward repair, confined to the transitive effect of this move: only
    // edges out of already-shifted tasks may push a successor, so tasks
    // unrelated to the move keep their dates bit for bit.
    let mut shifted: HashSet<Uuid> = HashSet::from([task_id]);
    for &id in &order {
        if shifted.contains(&id) {
            continue;
        }
        let Some(&i) = index_of.get(&id) else { continue };
        let duration = updated[i].duration_days().max(1);
        let mut required = updated[i].start;
        for edge in graph.predecessors_of(id) {
            if !shifted.contains(&edge.from) {
                continue;
            }
            if let Some(&p) = index_of.get(&edge.from) {
                required = required.max(implied_min_start(edge, &updated[p], duration));
            }
        }
        let push = (required - updated[i].start).num_days();
        if push > 0 {
            updated[i].shift_days(push);
            shifted.insert(id);
            debug!(task = %id, days = push, "dependent shifted forward");
        }
    }

    Ok(updated)
}

/// Minimal start the successor of `edge` may take given the predecessor's
/// current dates. Finishes are inclusive, so finish-to-start with zero lag
/// lands on the day after the predecessor ends.
fn implied_min_start(edge: &DepEdge, predecessor: &Task, successor_duration: i64) -> NaiveDate {
    let lag = Duration::days(edge.lag_days);
    match edge.kind {
        DependencyKind::FinishToStart => predecessor.end + Duration::days(1) + lag,
        DependencyKind::StartToStart => predecessor.start + lag,
        DependencyKind::FinishToFinish => {
            predecessor.end + Duration::days(1) + lag - Duration::days(successor_duration)
        }
        DependencyKind::StartToFinish => {
            predecessor.start + lag - Duration::days(successor_duration)
        }
    }
}
