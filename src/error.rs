use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the scheduling engine.
///
/// Structural errors carry the offending id set so callers can highlight the
/// tasks involved. None of these are fatal: a caller reverts the edit or
/// shows an inline warning and keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A task is its own ancestor in the work-breakdown structure.
    #[error("parent cycle in work breakdown involving {} task(s)", .ids.len())]
    CycleDetected { ids: Vec<Uuid> },

    /// The predecessor graph contains at least one cycle.
    #[error("dependency cycle involving {} task(s)", .ids.len())]
    CyclicDependency { ids: Vec<Uuid> },

    /// A referenced task id does not exist in the collection.
    #[error("unknown task id {id}")]
    DanglingReference { id: Uuid },

    /// A reschedule would start a task before its predecessors allow.
    #[error("task {id} cannot start before {} predecessor(s) finish", .conflicts.len())]
    DependencyViolation { id: Uuid, conflicts: Vec<Uuid> },
}
