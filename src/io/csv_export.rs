use std::collections::HashMap;
use std::path::Path;

use uuid::Uuid;

use super::IoError;
use crate::model::Task;

/// Export tasks to a semicolon-delimited CSV file matching the import
/// format.
///
/// Parent and predecessor cells carry task names (the import's second-pass
/// resolution reads them back); predecessor names are joined with `|`.
/// Dates are formatted as YYYY-MM-DD. Returns the number of tasks written.
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<usize, IoError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)?;

    wtr.write_record([
        "Task",
        "Start Date",
        "End Date",
        "Status",
        "Progress",
        "Priority",
        "Parent",
        "Predecessors",
        "Milestone",
        "Sort Order",
    ])?;

    let name_of: HashMap<Uuid, &str> = tasks.iter().map(|t| (t.id, t.name.as_str())).collect();

    for task in tasks {
        let parent = task
            .parent_id
            .and_then(|p| name_of.get(&p).copied())
            .unwrap_or("");
        let predecessors = task
            .predecessors
            .iter()
            .filter_map(|link| name_of.get(&link.id).copied())
            .collect::<Vec<_>>()
            .join("|");

        wtr.write_record([
            task.name.as_str(),
            &task.start.format("%Y-%m-%d").to_string(),
            &task.end.format("%Y-%m-%d").to_string(),
            task.status.label(),
            &task.progress.to_string(),
            &format!("{:?}", task.priority),
            parent,
            &predecessors,
            if task.is_milestone { "yes" } else { "" },
            &task.sort_order.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(tasks.len())
}
