use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the type of dependency between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

/// A scheduling link to a task that must precede the one declaring it.
///
/// Source data in the wild almost always uses finish-to-start with zero lag;
/// the other kinds and lags are honored everywhere they are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredecessorLink {
    pub id: Uuid,
    pub lag_days: i64,
    pub kind: DependencyKind,
}

impl PredecessorLink {
    /// Finish-to-start with zero lag, the common case.
    pub fn finish_to_start(id: Uuid) -> Self {
        Self {
            id,
            lag_days: 0,
            kind: DependencyKind::FinishToStart,
        }
    }

    pub fn with_lag(id: Uuid, lag_days: i64, kind: DependencyKind) -> Self {
        Self { id, lag_days, kind }
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Delayed => "Delayed",
        }
    }
}

/// Priority level, carried for interchange; no scheduling semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum TaskPriority {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// A single task or milestone in the schedule.
///
/// Dates are inclusive calendar days; `end >= start` always holds for tasks
/// built through the constructors. Depth in the work-breakdown structure is
/// never stored here — it is derived from `parent_id` by the hierarchy
/// builder. Expansion/collapse is caller-owned presentation state, not a
/// task field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Completion percentage, 0–100.
    pub progress: u8,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub description: String,
    /// Parent task in the work-breakdown structure; `None` for roots.
    pub parent_id: Option<Uuid>,
    /// Stable ordering among siblings sharing a parent.
    pub sort_order: i64,
    /// Tasks that must precede this one.
    pub predecessors: Vec<PredecessorLink>,
    /// If true, this is a milestone (rendered as a diamond, zero-duration).
    pub is_milestone: bool,
}

impl Task {
    /// Create a new task with sensible defaults.
    ///
    /// An `end` earlier than `start` is clamped up to `start`.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start,
            end: end.max(start),
            progress: 0,
            status: TaskStatus::Pending,
            priority: TaskPriority::None,
            description: String::new(),
            parent_id: None,
            sort_order: 0,
            predecessors: Vec::new(),
            is_milestone: false,
        }
    }

    /// Create a new milestone.
    pub fn new_milestone(name: impl Into<String>, date: NaiveDate) -> Self {
        let mut task = Self::new(name, date, date);
        task.is_milestone = true;
        task
    }

    /// Inclusive duration in calendar days; a one-day task has duration 1.
    ///
    /// Duration is always derived from the dates, never stored, so the two
    /// can never disagree.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Replace both dates, clamping `end` up to `start`.
    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start = start;
        self.end = end.max(start);
    }

    /// Move the whole span by a day delta, preserving duration.
    pub fn shift_days(&mut self, delta: i64) {
        self.start += Duration::days(delta);
        self.end += Duration::days(delta);
    }

    /// Set completion percentage, clamped to 100.
    pub fn set_progress(&mut self, percent: u8) {
        self.progress = percent.min(100);
    }

    /// Declare a predecessor link. Self-references and duplicates are ignored.
    pub fn add_predecessor(&mut self, link: PredecessorLink) {
        if link.id != self.id && !self.predecessors.iter().any(|p| p.id == link.id) {
            self.predecessors.push(link);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duration_is_inclusive() {
        let task = Task::new("Excavation", date(2026, 3, 1), date(2026, 3, 5));
        assert_eq!(task.duration_days(), 5);
    }

    #[test]
    fn one_day_task_and_milestone_have_duration_one() {
        let task = Task::new("Inspection", date(2026, 3, 1), date(2026, 3, 1));
        assert_eq!(task.duration_days(), 1);
        let ms = Task::new_milestone("Permit granted", date(2026, 3, 1));
        assert_eq!(ms.duration_days(), 1);
        assert!(ms.is_milestone);
    }

    #[test]
    fn inverted_dates_are_clamped() {
        let task = Task::new("Backwards", date(2026, 3, 10), date(2026, 3, 2));
        assert_eq!(task.start, task.end);

        let mut task = Task::new("Edit", date(2026, 3, 1), date(2026, 3, 5));
        task.set_dates(date(2026, 3, 8), date(2026, 3, 6));
        assert_eq!(task.start, date(2026, 3, 8));
        assert_eq!(task.end, date(2026, 3, 8));
    }

    #[test]
    fn shift_preserves_duration() {
        let mut task = Task::new("Framing", date(2026, 3, 1), date(2026, 3, 5));
        task.shift_days(3);
        assert_eq!(task.start, date(2026, 3, 4));
        assert_eq!(task.end, date(2026, 3, 8));
        assert_eq!(task.duration_days(), 5);
    }

    #[test]
    fn self_and_duplicate_predecessors_are_ignored() {
        let mut task = Task::new("Roofing", date(2026, 3, 1), date(2026, 3, 5));
        let other = Uuid::new_v4();
        task.add_predecessor(PredecessorLink::finish_to_start(task.id));
        task.add_predecessor(PredecessorLink::finish_to_start(other));
        task.add_predecessor(PredecessorLink::finish_to_start(other));
        assert_eq!(task.predecessors.len(), 1);
        assert_eq!(task.predecessors[0].id, other);
    }

    #[test]
    fn progress_clamps_to_hundred() {
        let mut task = Task::new("Paint", date(2026, 3, 1), date(2026, 3, 2));
        task.set_progress(250);
        assert_eq!(task.progress, 100);
    }
}
