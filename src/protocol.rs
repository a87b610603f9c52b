//! Query protocol: frame limit, validation, and response vocabulary.
//!
//! The wire format is deliberately minimal. A client sends one frame of at
//! most [`MAX_QUERY_BYTES`] raw bytes; the server answers with exactly one
//! newline-terminated line from the fixed response vocabulary and closes
//! the connection.

use crate::error::SearchError;

/// Maximum accepted raw query length in bytes
pub const MAX_QUERY_BYTES: usize = 1024;

/// Validate a raw query frame and extract the query string.
///
/// Validation runs against the original, unstripped length: a frame over
/// the limit is rejected even if it would trim down to something small.
/// Trailing fill bytes (NUL padding) and surrounding whitespace or line
/// terminators are not content and are stripped before comparison.
pub fn validate_query(raw: &[u8]) -> Result<&str, SearchError> {
    if raw.len() > MAX_QUERY_BYTES {
        return Err(SearchError::PayloadTooLarge(raw.len()));
    }

    let text = std::str::from_utf8(raw)?;
    let query = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());

    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    Ok(query)
}

/// One server response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// An exact copy of the query exists in the dataset
    Exists,
    /// No dataset line equals the query
    NotFound,
    /// The query was empty after stripping
    EmptyQuery,
    /// The raw frame exceeded the maximum length
    PayloadTooLarge,
    /// The dataset file does not exist
    FileNotFound,
    /// Any other failure; details stay in the log, never on the wire
    InternalError,
}

impl Response {
    /// The wire line for this response, without the trailing newline.
    pub fn as_line(&self) -> &'static str {
        match self {
            Response::Exists => "STRING EXISTS",
            Response::NotFound => "STRING NOT FOUND",
            Response::EmptyQuery => "ERROR: Empty query",
            Response::PayloadTooLarge => "ERROR: Payload too large",
            Response::FileNotFound => "ERROR: File not found",
            Response::InternalError => "ERROR: Internal server error",
        }
    }

    pub fn from_outcome(found: bool) -> Self {
        if found {
            Response::Exists
        } else {
            Response::NotFound
        }
    }
}

impl From<&SearchError> for Response {
    fn from(err: &SearchError) -> Self {
        match err {
            SearchError::EmptyQuery => Response::EmptyQuery,
            SearchError::PayloadTooLarge(_) => Response::PayloadTooLarge,
            SearchError::InvalidUtf8(_) => Response::InternalError,
            SearchError::DatasetUnavailable { .. } if err.is_not_found() => Response::FileNotFound,
            SearchError::DatasetUnavailable { .. } => Response::InternalError,
        }
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_plain_query() {
        assert_eq!(validate_query(b"beta").unwrap(), "beta");
    }

    #[test]
    fn test_validate_strips_padding_and_terminators() {
        assert_eq!(validate_query(b"beta\r\n").unwrap(), "beta");
        assert_eq!(validate_query(b"beta\0\0\0\0").unwrap(), "beta");
        assert_eq!(validate_query(b"  beta \n").unwrap(), "beta");
    }

    #[test]
    fn test_validate_empty_query() {
        assert!(matches!(validate_query(b""), Err(SearchError::EmptyQuery)));
        assert!(matches!(
            validate_query(b"\0\0\0\0"),
            Err(SearchError::EmptyQuery)
        ));
        assert!(matches!(
            validate_query(b" \r\n "),
            Err(SearchError::EmptyQuery)
        ));
    }

    #[test]
    fn test_validate_length_boundary() {
        let exact = vec![b'a'; MAX_QUERY_BYTES];
        assert!(validate_query(&exact).is_ok());

        let over = vec![b'a'; MAX_QUERY_BYTES + 1];
        assert!(matches!(
            validate_query(&over),
            Err(SearchError::PayloadTooLarge(n)) if n == MAX_QUERY_BYTES + 1
        ));
    }

    #[test]
    fn test_validate_length_uses_raw_bytes() {
        // 1025 bytes of padding trims to a short query but is still rejected
        let mut over = vec![0u8; MAX_QUERY_BYTES];
        over.extend_from_slice(b"x");
        assert!(matches!(
            validate_query(&over),
            Err(SearchError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_validate_rejects_invalid_utf8() {
        assert!(matches!(
            validate_query(&[0xff, 0xfe, b'a']),
            Err(SearchError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_response_lines() {
        assert_eq!(Response::Exists.as_line(), "STRING EXISTS");
        assert_eq!(Response::NotFound.as_line(), "STRING NOT FOUND");
        assert_eq!(Response::EmptyQuery.as_line(), "ERROR: Empty query");
        assert_eq!(Response::PayloadTooLarge.as_line(), "ERROR: Payload too large");
        assert_eq!(Response::FileNotFound.as_line(), "ERROR: File not found");
        assert_eq!(
            Response::InternalError.as_line(),
            "ERROR: Internal server error"
        );
    }

    #[test]
    fn test_response_from_error() {
        assert_eq!(Response::from(&SearchError::EmptyQuery), Response::EmptyQuery);
        assert_eq!(
            Response::from(&SearchError::PayloadTooLarge(2048)),
            Response::PayloadTooLarge
        );

        let missing = SearchError::dataset_unavailable(
            "gone.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(Response::from(&missing), Response::FileNotFound);

        let denied = SearchError::dataset_unavailable(
            "locked.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(Response::from(&denied), Response::InternalError);
    }
}
