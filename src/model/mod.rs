pub mod project;
pub mod task;
pub mod timeline;

pub use project::{Project, RemovalPolicy};
pub use task::{DependencyKind, PredecessorLink, Task, TaskPriority, TaskStatus};
pub use timeline::TimelineScale;
