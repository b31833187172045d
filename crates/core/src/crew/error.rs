//! Error types for crew assembly.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for assembly operations.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors that abort building a crew. A crew is never built from a partial set.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A required text field of an agent or task entry is empty.
    #[error("Invalid {kind} '{name}': field '{field}' must not be empty")]
    InvalidSpec {
        kind: &'static str,
        name: String,
        field: &'static str,
    },

    /// A task references an agent that was not constructed.
    #[error("Task '{task}' references unknown agent '{agent}'")]
    UnknownAgent { task: String, agent: String },

    /// Two outputs would be written to the same file.
    #[error("Output file {path:?} is used more than once")]
    DuplicateOutputFile { path: PathBuf },

    /// The results directory could not be created.
    #[error("Failed to create results directory {path:?}: {source}")]
    ResultsDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
