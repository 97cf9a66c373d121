//! Scheduling core for Gantt-style project timelines.
//!
//! Takes a flat collection of tasks with optional parent/child and
//! predecessor/successor relationships and produces everything a timeline
//! surface needs to draw and edit a schedule:
//!
//! - **`engine::hierarchy`**: a validated work-breakdown forest with derived
//!   depth levels
//! - **`engine::graph`**: the directed dependency graph with cycle and
//!   dangling-reference detection
//! - **`engine::layout`**: a month-aligned date axis and date↔pixel bar
//!   geometry at day/week/month scales
//! - **`engine::critical_path`**: CPM earliest/latest dates, total float,
//!   and critical-path membership
//! - **`engine::router`**: orthogonal dependency connectors between bars
//! - **`engine::reschedule`**: dependency-aware moves with transitive
//!   forward propagation
//! - **`io`**: CSV and JSON interchange for task collections
//!
//! Every pass is a pure, synchronous function from an immutable task
//! collection to a new output; the crate performs no network or process I/O
//! of its own. Callers own the task collection, expansion state, and
//! persistence, and replace their render state wholesale after each pass.

pub mod engine;
pub mod error;
pub mod io;
pub mod model;

pub use engine::critical_path::{compute_critical_path, ScheduledTask};
pub use engine::graph::{DepEdge, DependencyGraph};
pub use engine::hierarchy::{build_hierarchy, flatten_preorder, TaskNode};
pub use engine::layout::{BarRect, TimelineLayout, ROW_GAP, ROW_HEIGHT};
pub use engine::reschedule::{reschedule, RescheduleMode};
pub use engine::router::{route_connectors, Connector, CORNER_OFFSET};
pub use error::ScheduleError;
pub use model::{
    DependencyKind, PredecessorLink, Project, RemovalPolicy, Task, TaskPriority, TaskStatus,
    TimelineScale,
};
