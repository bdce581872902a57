use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while compiling the proceedings. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum ProceedingsError {
    #[error("submission {submission_number}: cannot derive identifier from first author: {reason}")]
    InvalidAuthor {
        submission_number: u32,
        reason: String,
    },

    #[error("PDF for submission {submission_number} not found at {}", path.display())]
    MissingPdf {
        submission_number: u32,
        path: PathBuf,
    },

    #[error("failed to count pages of {}: {source}", path.display())]
    PageCount {
        path: PathBuf,
        #[source]
        source: PageCountError,
    },

    #[error("PDF {} reports zero pages", path.display())]
    ZeroPages { path: PathBuf },

    #[error("metadata line {line}: {source}")]
    Metadata {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("submission {number} is missing required field `{field}`")]
    IncompleteSubmission { number: u32, field: &'static str },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ProceedingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProceedingsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors reported by a [`crate::contract::PageCounter`].
#[derive(Debug, Error)]
pub enum PageCountError {
    #[error("file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not read page count: {0}")]
    Unreadable(String),
}

/// Errors raised while reading a session schedule CSV.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("schedule line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
