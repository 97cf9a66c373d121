use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::engine::graph::{DepEdge, DependencyGraph};
use crate::error::ScheduleError;
use crate::model::{DependencyKind, Task};

/// Computed schedule data for one task.
///
/// All dates are inclusive calendar days, like the task's own dates: a task
/// occupying the 1st through the 5th has `early_finish` on the 5th and its
/// finish-to-start successor can start on the 6th.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub early_start: NaiveDate,
    pub early_finish: NaiveDate,
    pub late_start: NaiveDate,
    pub late_finish: NaiveDate,
    /// Days this task can slip without delaying the project end.
    pub total_float_days: i64,
    /// True when the task has zero total float.
    pub is_critical: bool,
}

/// Forward/backward-pass critical path computation.
///
/// The forward pass walks the topological order taking, per task, the latest
/// of its own start date and every predecessor constraint; the backward pass
/// walks in reverse from the project end. Total float is `late_start -
/// early_start` and the critical path is the zero-float set. A cyclic graph
/// fails with the propagated `CyclicDependency` instead of producing a wrong
/// answer.
pub fn compute_critical_path(
    graph: &DependencyGraph,
    tasks: &[Task],
) -> Result<HashMap<Uuid, ScheduledTask>, ScheduleError> {
    let order = graph.topological_order()?;
    let by_id: HashMap<Uuid, &Task> = tasks.iter().map(|t| (t.id, t)).collect();

    // Forward pass: earliest start/finish per task.
    let mut early: HashMap<Uuid, (NaiveDate, NaiveDate)> = HashMap::with_capacity(order.len());
    for &id in &order {
        let Some(task) = by_id.get(&id) else { continue };
        let duration = task.duration_days().max(1);
        let mut start = task.start;
        for edge in graph.predecessors_of(id) {
            if let Some(&(pred_start, pred_finish)) = early.get(&edge.from) {
                let bound = earliest_start_bound(edge, pred_start, pred_finish, duration);
                start = start.max(bound);
            }
        }
        early.insert(id, (start, start + Duration::days(duration - 1)));
    }

    let Some(project_end) = early.values().map(|&(_, finish)| finish).max() else {
        return Ok(HashMap::new());
    };
    debug!(%project_end, tasks = order.len(), "forward pass complete");

    // Backward pass: latest finish/start, pinned to the project end.
    let mut late: HashMap<Uuid, (NaiveDate, NaiveDate)> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let Some(task) = by_id.get(&id) else { continue };
        let duration = task.duration_days().max(1);
        let mut finish = project_end;
        for edge in graph.successors_of(id) {
            if let Some(&(succ_late_start, succ_late_finish)) = late.get(&edge.to) {
                let bound =
                    latest_finish_bound(edge, succ_late_start, succ_late_finish, duration);
                finish = finish.min(bound);
            }
        }
        late.insert(id, (finish - Duration::days(duration - 1), finish));
    }

    let mut schedule = HashMap::with_capacity(order.len());
    for &id in &order {
        let (Some(&(early_start, early_finish)), Some(&(late_start, late_finish))) =
            (early.get(&id), late.get(&id))
        else {
            continue;
        };
        let total_float_days = (late_start - early_start).num_days();
        schedule.insert(
            id,
            ScheduledTask {
                early_start,
                early_finish,
                late_start,
                late_finish,
                total_float_days,
                is_critical: total_float_days == 0,
            },
        );
    }
    Ok(schedule)
}

/// Earliest start the successor of `edge` may take, given the predecessor's
/// early dates. Finishes are inclusive, so "after it finishes" is `+1 day`.
fn earliest_start_bound(
    edge: &DepEdge,
    pred_start: NaiveDate,
    pred_finish: NaiveDate,
    successor_duration: i64,
) -> NaiveDate {
    let lag = Duration::days(edge.lag_days);
    match edge.kind {
        DependencyKind::FinishToStart => pred_finish + Duration::days(1) + lag,
        DependencyKind::StartToStart => pred_start + lag,
        DependencyKind::FinishToFinish => {
            pred_finish + Duration::days(1) + lag - Duration::days(successor_duration)
        }
        DependencyKind::StartToFinish => {
            pred_start + lag - Duration::days(successor_duration)
        }
    }
}

/// Latest finish the predecessor of `edge` may take, given the successor's
/// late dates. Mirror image of `earliest_start_bound`.
fn latest_finish_bound(
    edge: &DepEdge,
    succ_late_start: NaiveDate,
    succ_late_finish: NaiveDate,
    predecessor_duration: i64,
) -> NaiveDate {
    let lag = Duration::days(edge.lag_days);
    match edge.kind {
        DependencyKind::FinishToStart => succ_late_start - lag - Duration::days(1),
        DependencyKind::StartToStart => {
            succ_late_start - lag + Duration::days(predecessor_duration - 1)
        }
        DependencyKind::FinishToFinish => succ_late_finish - lag,
        DependencyKind::StartToFinish => {
            succ_late_finish + Duration::days(1) - lag + Duration::days(predecessor_duration - 1)
        }
    }
}
