// ABOUTME: Utility functions for the inklayers application
// ABOUTME: Provides path validation and input file discovery helpers

use crate::errors::{InkError, Result};
use log::warn;
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(InkError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(InkError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(InkError::FileReadError)?;
    } else if !path.is_dir() {
        return Err(InkError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory_exists(parent)?;
        }
    }
    Ok(())
}

/// Expand input arguments containing `*` or `?` into the matching files.
/// Other arguments are kept as given.
pub fn expand_input_patterns(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.contains('*') && !input.contains('?') {
            files.push(PathBuf::from(input));
            continue;
        }
        let matches = glob::glob(input)
            .map_err(|e| InkError::ValidationError(format!("Invalid glob pattern: {}", e)))?;
        let before = files.len();
        files.extend(matches.flatten());
        if files.len() == before {
            warn!("No input file matches pattern: {}", input);
        }
    }
    Ok(files)
}
