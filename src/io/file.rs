use std::path::Path;

use super::IoError;
use crate::model::Project;

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project, IoError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
