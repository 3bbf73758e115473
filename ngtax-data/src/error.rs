use ngtax_core::{CitError, InputError, RecordError, RepositoryError};
use thiserror::Error;

/// Errors raised while loading, computing or saving a batch.
///
/// Row numbers are 1-based and count data rows only (the header is row 0).
#[derive(Debug, Error)]
pub enum LoadError {
    /// Bad structure, a missing required column or an unreadable cell.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("row {row}: unrecognised {column} '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {source}")]
    Input {
        row: usize,
        #[source]
        source: InputError,
    },

    #[error("row {row}: {source}")]
    Cit {
        row: usize,
        #[source]
        source: CitError,
    },

    #[error("row {row}: {source}")]
    Record {
        row: usize,
        #[source]
        source: RecordError,
    },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl LoadError {
    /// The data row the error points at, when there is one.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::InvalidValue { row, .. }
            | Self::Input { row, .. }
            | Self::Cit { row, .. }
            | Self::Record { row, .. } => Some(*row),
            Self::Parse(_) | Self::Repository(_) => None,
        }
    }
}
