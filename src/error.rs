//! Error Module
//! One error type shared by path resolution, fetching, parsing and figure output.

use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

/// Coarse failure category, used by callers that decide whether to skip or abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    PreconditionFailed,
    IoFailure,
    ParseFailure,
}

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("remote request for {location} failed: {message}")]
    Remote { location: String, message: String },
    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },
}

pub type Result<T> = std::result::Result<T, AccessError>;

impl AccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AccessError::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
            AccessError::Io { .. } | AccessError::Remote { .. } => ErrorKind::IoFailure,
            AccessError::Parse { .. } => ErrorKind::ParseFailure,
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        AccessError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(what: impl Into<String>, message: impl ToString) -> Self {
        AccessError::Parse {
            what: what.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn remote(location: impl Into<String>, message: impl ToString) -> Self {
        AccessError::Remote {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Classify a Polars failure against `what`: its I/O variant stays an I/O
    /// failure, everything else is malformed content.
    pub(crate) fn from_polars(what: impl Into<String>, err: PolarsError) -> Self {
        match err {
            PolarsError::IO { error, .. } => {
                AccessError::io(what, io::Error::new(error.kind(), error.to_string()))
            }
            other => AccessError::parse(what, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_count_as_io_failures() {
        let err = AccessError::remote("gs://bucket/key", "503 Service Unavailable");
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(err.to_string().contains("gs://bucket/key"));
    }

    #[test]
    fn polars_compute_errors_are_parse_failures() {
        let err = AccessError::from_polars(
            "meta.feather",
            PolarsError::ComputeError("bad footer".into()),
        );
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn polars_io_errors_stay_io_failures() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err = AccessError::from_polars("meta.feather", PolarsError::from(io_err));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }
}
