//! Range error types.

use s3lite_core::{S3Error, S3ErrorCode};

/// Errors produced while parsing, resolving or reading byte ranges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// The `Range` header could not be parsed.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// The range starts at or beyond the end of the content.
    #[error("range starting at {start} is not satisfiable for content length {length}")]
    RangeNotSatisfiable {
        /// Requested start offset.
        start: i64,
        /// Absolute content length.
        length: u64,
    },

    /// The request uses a range form this server does not serve.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A range reader was used in a way its position does not allow.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl RangeError {
    /// The S3 error code this error is reported as.
    #[must_use]
    pub fn code(&self) -> S3ErrorCode {
        match self {
            Self::InvalidRange(_) => S3ErrorCode::InvalidArgument,
            Self::RangeNotSatisfiable { .. } => S3ErrorCode::InvalidRange,
            Self::NotImplemented(_) => S3ErrorCode::NotImplemented,
            Self::InvalidState(_) => S3ErrorCode::InvalidRequest,
        }
    }
}

impl From<RangeError> for S3Error {
    fn from(err: RangeError) -> Self {
        S3Error::with_message(err.code(), err.to_string())
    }
}
