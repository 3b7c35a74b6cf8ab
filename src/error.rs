use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a dashboard run.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Input file '{}' not found", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read input file '{}': {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed input: required column '{column}' not found in header")]
    MissingColumn { column: String },

    #[error("Malformed input at line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("Malformed input: CSV must contain at least one data row")]
    Empty,

    #[error("Cannot write to '{}': {source}", .path.display())]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DashboardError {
    /// True for errors caused by the content of the input file.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingColumn { .. }
                | DashboardError::MalformedRow { .. }
                | DashboardError::Empty
        )
    }
}
