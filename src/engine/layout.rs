use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::engine::hierarchy::TaskNode;
use crate::model::{Task, TimelineScale};

/// Height of one task row in pixels.
pub const ROW_HEIGHT: f32 = 30.0;
/// Vertical gap between rows.
pub const ROW_GAP: f32 = 2.0;

/// Pixel-space rectangle for one task bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub left_px: f32,
    pub width_px: f32,
    pub top_px: f32,
}

impl BarRect {
    pub fn right_px(&self) -> f32 {
        self.left_px + self.width_px
    }
}

/// A computed timeline: shared date axis plus per-task bar geometry.
///
/// The axis spans the earliest task start to the latest task end, widened to
/// whole calendar months so the header grid lands on month boundaries. One
/// fixed-height row is allocated per visible task in pre-order; descendants
/// of collapsed nodes get no row and no bar.
#[derive(Debug, Clone)]
pub struct TimelineLayout {
    pub axis_start: NaiveDate,
    pub axis_end: NaiveDate,
    /// Horizontal pixels per calendar day.
    pub column_width_px: f32,
    rows: Vec<Uuid>,
    bars: HashMap<Uuid, BarRect>,
}

impl TimelineLayout {
    /// Compute the layout for one render pass.
    ///
    /// The axis is anchored on the whole task set, not just the visible
    /// rows, so expanding a subtree never moves bars that were already on
    /// screen. An empty task set falls back to a one-month window around
    /// today.
    pub fn compute(
        tasks: &[Task],
        forest: &[TaskNode],
        collapsed: &HashSet<Uuid>,
        scale: TimelineScale,
    ) -> Self {
        let column_width_px = scale.pixels_per_day();
        let (axis_start, axis_end) = axis_bounds(tasks);

        let mut rows = Vec::new();
        for root in forest {
            visible_rows(root, collapsed, &mut rows);
        }

        let by_id: HashMap<Uuid, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
        let mut bars = HashMap::with_capacity(rows.len());
        for (row, id) in rows.iter().enumerate() {
            let Some(task) = by_id.get(id) else { continue };
            let offset_days = (task.start - axis_start).num_days();
            // Zero-length spans still get one full day column.
            let span_days = task.duration_days().max(1);
            bars.insert(
                *id,
                BarRect {
                    left_px: offset_days as f32 * column_width_px,
                    width_px: span_days as f32 * column_width_px,
                    top_px: row as f32 * (ROW_HEIGHT + ROW_GAP),
                },
            );
        }

        Self {
            axis_start,
            axis_end,
            column_width_px,
            rows,
            bars,
        }
    }

    /// Bar geometry for a task; `None` when its row is collapsed away.
    pub fn bar_for(&self, id: Uuid) -> Option<BarRect> {
        self.bars.get(&id).copied()
    }

    /// Visible task ids, top to bottom.
    pub fn rows(&self) -> &[Uuid] {
        &self.rows
    }

    /// Convert a date to an x-pixel offset from the axis start.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        (date - self.axis_start).num_days() as f32 * self.column_width_px
    }

    /// Convert an x-pixel offset back to a date.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let days = (x / self.column_width_px).round() as i64;
        self.axis_start + Duration::days(days)
    }

    /// Full axis width in pixels, inclusive of the last day column.
    pub fn total_width_px(&self) -> f32 {
        ((self.axis_end - self.axis_start).num_days() + 1) as f32 * self.column_width_px
    }

    /// Height of all visible rows in pixels.
    pub fn total_height_px(&self) -> f32 {
        self.rows.len() as f32 * (ROW_HEIGHT + ROW_GAP)
    }
}

fn visible_rows(node: &TaskNode, collapsed: &HashSet<Uuid>, out: &mut Vec<Uuid>) {
    out.push(node.id);
    if collapsed.contains(&node.id) {
        return;
    }
    for child in &node.children {
        visible_rows(child, collapsed, out);
    }
}

fn axis_bounds(tasks: &[Task]) -> (NaiveDate, NaiveDate) {
    let earliest = tasks.iter().map(|t| t.start).min();
    let latest = tasks.iter().map(|t| t.end).max();
    match (earliest, latest) {
        (Some(start), Some(end)) => (month_floor(start), month_ceil(end.max(start))),
        _ => {
            let today = chrono::Local::now().date_naive();
            (month_floor(today), month_ceil(today))
        }
    }
}

/// First day of the date's month.
fn month_floor(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Last day of the date's month.
fn month_ceil(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .map(|first_of_next| first_of_next - Duration::days(1))
        .unwrap_or(date)
}
