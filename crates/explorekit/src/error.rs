//! Error types for Explorekit
//!
//! This module provides error types with the following design goals:
//! - Human-readable error messages for teachers and students
//! - Clear categorization for programmatic handling
//!
//! The diff and evaluation core never fails on data-shape problems. Those
//! degrade to `false`, `None` or an empty list. Errors here come from
//! structural defects, session mutations and the export pipeline.

use thiserror::Error;

/// Result type alias using Explorekit's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Explorekit error types.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON could not be parsed or serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading or writing exercise files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A folder contains itself (directly or transitively).
    #[error("cycle detected at node {id}")]
    Cycle { id: String },

    /// Two roots in one system root share a name.
    #[error("duplicate root name: {0}")]
    DuplicateRoot(String),

    /// No item exists at the given path (or recycle bin position).
    #[error("not found: {0}")]
    NotFound(String),

    /// An item with the same name already exists in the destination folder.
    #[error("an item named \"{0}\" already exists")]
    NameConflict(String),

    /// Protected system folders cannot be moved, renamed or deleted.
    #[error("protected folder: {0}")]
    Protected(String),

    /// Item names must be non-empty and cannot contain a separator.
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// The requested destination cannot receive the item.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// Task DSL validation failed. Display shows the first error.
    #[error("task validation failed: {}", first(.0))]
    Validation(Vec<String>),

    /// Legacy task conversion failed. Display shows the first error.
    #[error("task conversion failed: {}", first(.0))]
    Conversion(Vec<String>),

    /// Nothing left to export after filtering.
    #[error("no valid tasks to export")]
    NoTasks,
}

fn first(errors: &[String]) -> &str {
    errors.first().map(String::as_str).unwrap_or("unknown error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_displays_first_error() {
        let err = Error::Validation(vec![
            "tasks[0].subjectId is required for type \"move\"".to_string(),
            "tasks[1].type \"jump\" is unknown".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "task validation failed: tasks[0].subjectId is required for type \"move\""
        );
    }

    #[test]
    fn empty_error_list_still_displays() {
        let err = Error::Conversion(vec![]);
        assert_eq!(err.to_string(), "task conversion failed: unknown error");
    }
}
