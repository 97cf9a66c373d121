pub mod csv_export;
pub mod csv_import;
pub mod file;

use thiserror::Error;

/// Errors from CSV/JSON interchange.
///
/// Deliberately separate from `ScheduleError`: a malformed file and an
/// invalid schedule are different failure domains with different audiences.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read or write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "CSV is missing required columns; found headers {found:?} \
         (need columns for task name, start date, end date)"
    )]
    MissingColumns { found: Vec<String> },

    #[error("no valid tasks found ({skipped} rows skipped)")]
    Empty { skipped: usize },
}
