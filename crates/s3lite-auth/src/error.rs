//! Authentication error types.

use s3lite_core::{S3Error, S3ErrorCode};

/// Errors that can occur while authenticating a request or loading users.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `Authorization` header is not of the form `AWS <id>:<signature>`.
    #[error("invalid Authorization header: {0}")]
    InvalidSecurity(String),

    /// The access key id is not known to the user directory.
    #[error("unknown access key id: {0}")]
    InvalidAccessKeyId(String),

    /// The computed signature does not match the provided signature.
    #[error("signature does not match")]
    SignatureDoesNotMatch,

    /// The request time is missing, unparseable, or outside the accepted window.
    #[error("request time too skewed: {0}")]
    RequestTimeTooSkewed(String),

    /// A line of a user file could not be parsed.
    #[error("malformed user file at line {line}: {reason}")]
    MalformedUserFile {
        /// One-based line number.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// A user file could not be read.
    #[error("failed to read user file {path}: {source}")]
    UserFile {
        /// Path of the user file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The HMAC could not be computed.
    #[error("failed to compute signature: {0}")]
    Signing(String),
}

impl AuthError {
    /// The S3 error code this error is reported as.
    #[must_use]
    pub fn code(&self) -> S3ErrorCode {
        match self {
            Self::InvalidSecurity(_) => S3ErrorCode::InvalidSecurity,
            Self::InvalidAccessKeyId(_) => S3ErrorCode::InvalidAccessKeyId,
            Self::SignatureDoesNotMatch => S3ErrorCode::SignatureDoesNotMatch,
            Self::RequestTimeTooSkewed(_) => S3ErrorCode::RequestTimeTooSkewed,
            Self::MalformedUserFile { .. } | Self::UserFile { .. } | Self::Signing(_) => {
                S3ErrorCode::InternalError
            }
        }
    }
}

impl From<AuthError> for S3Error {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::InvalidAccessKeyId(_) | AuthError::SignatureDoesNotMatch => {
                S3Error::new(err.code())
            }
            _ => S3Error::with_message(err.code(), err.to_string()),
        }
    }
}
