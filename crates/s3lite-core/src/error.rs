//! Error types for s3lite.
//!
//! [`S3ErrorCode`] is the protocol-level code set produced by the s3lite
//! components, each with its conventional HTTP status. Component crates
//! convert their own errors into [`S3Error`], so the orchestration layer can
//! render any failure without knowing which component raised it.
//!
//! # Usage
//!
//! ```
//! use s3lite_core::{S3Error, S3ErrorCode};
//!
//! let err = S3Error::new(S3ErrorCode::SignatureDoesNotMatch);
//! assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
//! assert_eq!(err.code.as_str(), "SignatureDoesNotMatch");
//! ```

use std::fmt;

/// Core error type for s3lite infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum S3LiteError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for s3lite infrastructure operations.
pub type S3LiteResult<T> = Result<T, S3LiteError>;

/// S3 error codes produced by the s3lite components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum S3ErrorCode {
    /// The requestor is known but lacks the required grant.
    AccessDenied,
    /// The access key id is not registered.
    InvalidAccessKeyId,
    /// The `Authorization` header is malformed.
    InvalidSecurity,
    /// The computed signature differs from the provided one.
    SignatureDoesNotMatch,
    /// The request timestamp is outside the accepted window.
    RequestTimeTooSkewed,
    /// An argument (for example a permission or range header) is malformed.
    InvalidArgument,
    /// An access control policy document is malformed.
    MalformedACLError,
    /// The requested range cannot be satisfied.
    InvalidRange,
    /// The request uses functionality that is not implemented.
    NotImplemented,
    /// The bucket does not exist.
    NoSuchBucket,
    /// The key does not exist.
    NoSuchKey,
    /// The request is invalid for the current state.
    InvalidRequest,
    /// Unexpected internal failure.
    InternalError,
}

impl S3ErrorCode {
    /// Returns the error code as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "AccessDenied",
            Self::InvalidAccessKeyId => "InvalidAccessKeyId",
            Self::InvalidSecurity => "InvalidSecurity",
            Self::SignatureDoesNotMatch => "SignatureDoesNotMatch",
            Self::RequestTimeTooSkewed => "RequestTimeTooSkewed",
            Self::InvalidArgument => "InvalidArgument",
            Self::MalformedACLError => "MalformedACLError",
            Self::InvalidRange => "InvalidRange",
            Self::NotImplemented => "NotImplemented",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::InvalidRequest => "InvalidRequest",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InvalidArgument | Self::MalformedACLError | Self::InvalidRequest => {
                http::StatusCode::BAD_REQUEST
            }
            Self::AccessDenied
            | Self::InvalidAccessKeyId
            | Self::InvalidSecurity
            | Self::SignatureDoesNotMatch
            | Self::RequestTimeTooSkewed => http::StatusCode::FORBIDDEN,
            Self::NoSuchBucket | Self::NoSuchKey => http::StatusCode::NOT_FOUND,
            Self::InvalidRange => http::StatusCode::RANGE_NOT_SATISFIABLE,
            Self::NotImplemented => http::StatusCode::NOT_IMPLEMENTED,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the default message for this error.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::AccessDenied => "Access Denied",
            Self::InvalidAccessKeyId => {
                "The AWS Access Key Id you provided does not exist in our records"
            }
            Self::InvalidSecurity => "The provided security credentials are not valid",
            Self::SignatureDoesNotMatch => {
                "The request signature we calculated does not match the signature you provided"
            }
            Self::RequestTimeTooSkewed => {
                "The difference between the request time and the server's time is too large"
            }
            Self::InvalidArgument => "Invalid Argument",
            Self::MalformedACLError => {
                "The XML you provided was not well-formed or did not validate against our published schema"
            }
            Self::InvalidRange => "The requested range is not satisfiable",
            Self::NotImplemented => {
                "A header you provided implies functionality that is not implemented"
            }
            Self::NoSuchBucket => "The specified bucket does not exist",
            Self::NoSuchKey => "The specified key does not exist",
            Self::InvalidRequest => "Invalid Request",
            Self::InternalError => "We encountered an internal error. Please try again.",
        }
    }
}

impl fmt::Display for S3ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protocol-visible S3 error.
#[derive(Debug, Clone)]
pub struct S3Error {
    /// The error code.
    pub code: S3ErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The resource that caused the error.
    pub resource: Option<String>,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
}

impl fmt::Display for S3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3Error({}): {}", self.code, self.message)
    }
}

impl std::error::Error for S3Error {}

impl S3Error {
    /// Create a new error with the code's default message and status.
    #[must_use]
    pub fn new(code: S3ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_owned(),
            resource: None,
            status_code: code.default_status_code(),
        }
    }

    /// Create a new error with a custom message.
    #[must_use]
    pub fn with_message(code: S3ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::new(code)
        }
    }

    /// Set the resource that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Create a NoSuchBucket error.
    #[must_use]
    pub fn no_such_bucket(bucket: impl Into<String>) -> Self {
        Self::new(S3ErrorCode::NoSuchBucket).with_resource(bucket)
    }

    /// Create a NoSuchKey error.
    #[must_use]
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::new(S3ErrorCode::NoSuchKey).with_resource(key)
    }

    /// Create an InternalError error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(S3ErrorCode::InternalError, message)
    }
}

impl From<S3LiteError> for S3Error {
    fn from(err: S3LiteError) -> Self {
        tracing::error!(error = %err, "internal failure surfaced as S3 error");
        Self::internal_error(err.to_string())
    }
}
