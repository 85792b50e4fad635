//! ACL error types.

use s3lite_core::{S3Error, S3ErrorCode};

/// Errors produced by the access control policy engine.
#[derive(Debug, thiserror::Error)]
pub enum AclError {
    /// The permission text is empty or names an unknown action.
    #[error("invalid permission: {0:?}")]
    InvalidAction(String),

    /// The policy already holds the maximum number of grants.
    #[error("too many grants (limit {limit})")]
    TooManyGrants {
        /// Maximum number of grants per policy.
        limit: usize,
    },

    /// No grant allows the requested access.
    #[error("access denied: {grantee} lacks {permission}")]
    AccessDenied {
        /// The requesting grantee.
        grantee: String,
        /// The requested permission.
        permission: String,
    },

    /// An ACL document is not well formed or misses required content.
    #[error("malformed access control policy: {0}")]
    MalformedDocument(String),

    /// The policy has no owner, so it cannot be encoded.
    #[error("access control policy has no owner")]
    MissingOwner,

    /// Writing the encoded document failed.
    #[error("failed to encode access control policy: {0}")]
    Encode(#[from] std::io::Error),
}

impl AclError {
    /// The S3 error code this error is reported as.
    #[must_use]
    pub fn code(&self) -> S3ErrorCode {
        match self {
            Self::InvalidAction(_) | Self::TooManyGrants { .. } => S3ErrorCode::InvalidArgument,
            Self::AccessDenied { .. } => S3ErrorCode::AccessDenied,
            Self::MalformedDocument(_) => S3ErrorCode::MalformedACLError,
            Self::MissingOwner | Self::Encode(_) => S3ErrorCode::InternalError,
        }
    }
}

impl From<AclError> for S3Error {
    fn from(err: AclError) -> Self {
        S3Error::with_message(err.code(), err.to_string())
    }
}
