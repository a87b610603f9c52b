//! Error taxonomy for the query path.
//!
//! Every variant reachable from a single query maps to exactly one wire
//! response line; none of them are fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

use crate::protocol::MAX_QUERY_BYTES;

/// Result type for query operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while serving a single query
#[derive(Error, Debug)]
pub enum SearchError {
    /// The query was empty after stripping padding and terminators
    #[error("empty query")]
    EmptyQuery,

    /// The raw frame exceeded the protocol maximum
    #[error("payload of {0} bytes exceeds the {MAX_QUERY_BYTES}-byte limit")]
    PayloadTooLarge(usize),

    /// The query bytes were not valid UTF-8
    #[error("query is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The dataset file could not be opened or read
    #[error("dataset '{path}' unavailable: {source}")]
    DatasetUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SearchError {
    pub fn dataset_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DatasetUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Whether the dataset failure was a missing file, as opposed to a
    /// permission or read problem.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DatasetUnavailable { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = SearchError::dataset_unavailable(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.is_not_found());

        let err = SearchError::dataset_unavailable(
            "locked.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(SearchError::EmptyQuery.to_string(), "empty query");
        assert_eq!(
            SearchError::PayloadTooLarge(1025).to_string(),
            "payload of 1025 bytes exceeds the 1024-byte limit"
        );
    }
}
