pub mod critical_path;
pub mod graph;
pub mod hierarchy;
pub mod layout;
pub mod reschedule;
pub mod router;
