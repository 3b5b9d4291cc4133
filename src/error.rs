use std::fmt;
use std::io;

/// Unified error type for the retrieval engine and its collaborators.
#[derive(Debug)]
pub enum Error {
    /// Rank key negative or not an integer. Raised at record construction,
    /// never by the indexes.
    InvalidRecord(String),
    /// Extract-minimum on an index with no remaining elements.
    /// Recoverable: it only means fewer than K results exist.
    EmptyIndex,
    /// A source row the ingestion layer could not turn into a lap time.
    MalformedRow { line: usize, reason: String },
    /// IO error while reading sources or writing the report.
    Io(io::Error),
    /// Report serialization failed.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRecord(msg) => write!(f, "Invalid record: {msg}"),
            Error::EmptyIndex => write!(f, "Index is empty"),
            Error::MalformedRow { line, reason } => {
                write!(f, "Malformed row at line {line}: {reason}")
            }
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
