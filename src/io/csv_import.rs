use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use super::IoError;
use crate::model::task::{PredecessorLink, TaskPriority, TaskStatus};
use crate::model::Task;

/// Canonical columns the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Col {
    Name,
    Start,
    End,
    Status,
    Progress,
    Priority,
    Description,
    Parent,
    Predecessors,
    SortOrder,
    Milestone,
}

/// Map a status string to a task status.
fn parse_status(status: &str) -> TaskStatus {
    match status.trim().to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" => TaskStatus::Completed,
        "in progress" | "in-progress" | "active" | "started" => TaskStatus::InProgress,
        "delayed" | "late" | "overdue" | "behind" => TaskStatus::Delayed,
        _ => TaskStatus::Pending,
    }
}

fn parse_priority(s: &str) -> TaskPriority {
    match s.trim().to_lowercase().as_str() {
        "critical" => TaskPriority::Critical,
        "high" => TaskPriority::High,
        "medium" | "med" | "normal" => TaskPriority::Medium,
        "low" => TaskPriority::Low,
        _ => TaskPriority::None,
    }
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &[
        "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d", "%m-%d-%Y",
    ] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Col> {
    match normalized {
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Col::Name)
        }

        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Col::Start),

        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Col::End),

        "status" | "state" | "stage" => Some(Col::Status),

        "progress" | "done" | "percentdone" | "percentcomplete" | "complete" => {
            Some(Col::Progress)
        }

        "priority" | "pri" | "importance" => Some(Col::Priority),

        "description" | "notes" | "note" | "details" | "comment" | "comments" => {
            Some(Col::Description)
        }

        "parent" | "parenttask" | "parentname" | "subtaskof" => Some(Col::Parent),

        "predecessors" | "predecessor" | "dependson" | "deps" | "after" => {
            Some(Col::Predecessors)
        }

        "sortorder" | "order" | "position" | "rank" => Some(Col::SortOrder),

        "milestone" | "ismilestone" | "type" => Some(Col::Milestone),

        _ => None,
    }
}

/// Fields gathered from one CSV record before link resolution.
#[derive(Default)]
struct RawRow {
    name: Option<String>,
    start: Option<String>,
    end: Option<String>,
    status: Option<String>,
    progress: Option<String>,
    priority: Option<String>,
    description: Option<String>,
    parent: Option<String>,
    predecessors: Option<String>,
    sort_order: Option<String>,
    milestone: Option<String>,
}

/// Import tasks from a CSV file.
///
/// Auto-detects the delimiter (comma, semicolon, tab) and matches column
/// headers flexibly (e.g. "Task Label", "Start Date", "Depends On").
/// Parent and predecessor cells name other rows by task name and are
/// resolved in a second pass once every row has an id; predecessor cells
/// may list several names separated by `|` or `;`. Returns
/// `(tasks, skipped_count)` on success.
pub fn import_csv(path: &Path) -> Result<(Vec<Task>, usize), IoError> {
    // Read the whole file to detect the delimiter from the first line.
    let content = std::fs::read_to_string(path)?;

    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Col>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |c: Col| col_map.iter().any(|m| *m == Some(c));
    if !has(Col::Name) || !has(Col::Start) || !has(Col::End) {
        return Err(IoError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    // First pass: parse rows, keeping raw parent/predecessor names aside.
    let mut tasks: Vec<Task> = Vec::new();
    let mut parent_names: Vec<Option<String>> = Vec::new();
    let mut predecessor_names: Vec<Vec<String>> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2; // 1-based, after the header row
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed CSV row");
                skipped += 1;
                continue;
            }
        };

        let mut raw = RawRow::default();
        for (col_idx, field) in record.iter().enumerate() {
            let Some(Some(col)) = col_map.get(col_idx) else {
                continue;
            };
            let value = Some(field.trim().to_string());
            match col {
                Col::Name => raw.name = value,
                Col::Start => raw.start = value,
                Col::End => raw.end = value,
                Col::Status => raw.status = value,
                Col::Progress => raw.progress = value,
                Col::Priority => raw.priority = value,
                Col::Description => raw.description = value,
                Col::Parent => raw.parent = value,
                Col::Predecessors => raw.predecessors = value,
                Col::SortOrder => raw.sort_order = value,
                Col::Milestone => raw.milestone = value,
            }
        }

        let name = match raw.name {
            Some(n) if !n.is_empty() => n,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let Some(start) = raw.start.as_deref().and_then(parse_date) else {
            warn!(line, value = raw.start.as_deref().unwrap_or(""), "invalid start date");
            skipped += 1;
            continue;
        };
        let Some(end) = raw.end.as_deref().and_then(parse_date) else {
            warn!(line, value = raw.end.as_deref().unwrap_or(""), "invalid end date");
            skipped += 1;
            continue;
        };

        let mut task = Task::new(name, start, end);
        task.status = raw.status.as_deref().map(parse_status).unwrap_or_default();
        task.progress = raw
            .progress
            .as_deref()
            .and_then(|s| s.trim().trim_end_matches('%').parse::<u8>().ok())
            .unwrap_or(0)
            .min(100);
        task.priority = raw.priority.as_deref().map(parse_priority).unwrap_or_default();
        task.description = raw.description.unwrap_or_default();
        task.sort_order = raw
            .sort_order
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(tasks.len() as i64);

        // Explicit milestone column wins; otherwise zero-length spans count.
        task.is_milestone = raw
            .milestone
            .as_deref()
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1" | "milestone"))
            .unwrap_or(start == end);
        if task.is_milestone {
            task.end = task.start;
        }

        parent_names.push(raw.parent.filter(|s| !s.is_empty()));
        predecessor_names.push(
            raw.predecessors
                .map(|cell| {
                    cell.split(['|', ';'])
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        );
        tasks.push(task);
    }

    if tasks.is_empty() {
        return Err(IoError::Empty { skipped });
    }

    // Second pass: resolve parent and predecessor names to ids.
    let name_to_id: HashMap<String, Uuid> = tasks
        .iter()
        .map(|t| (t.name.to_lowercase(), t.id))
        .collect();

    for (i, parent_name) in parent_names.iter().enumerate() {
        if let Some(pname) = parent_name {
            match name_to_id.get(&pname.to_lowercase()) {
                // A row naming itself as its parent gets no link.
                Some(&pid) if pid != tasks[i].id => tasks[i].parent_id = Some(pid),
                Some(_) => warn!(task = %tasks[i].name, "row names itself as parent"),
                None => warn!(task = %tasks[i].name, parent = %pname, "parent not found"),
            }
        }
    }

    for (i, names) in predecessor_names.iter().enumerate() {
        for pname in names {
            match name_to_id.get(&pname.to_lowercase()) {
                Some(&pid) => {
                    // add_predecessor already drops self-references.
                    tasks[i].add_predecessor(PredecessorLink::finish_to_start(pid));
                }
                None => {
                    warn!(task = %tasks[i].name, predecessor = %pname, "predecessor not found");
                }
            }
        }
    }

    Ok((tasks, skipped))
}
