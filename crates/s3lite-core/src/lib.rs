//! Core types, configuration, and error codes for s3lite.
//!
//! This crate provides the building blocks shared by every s3lite component:
//! the [`CanonicalUser`] identity that authentication produces and access
//! control consumes, the [`S3LiteConfig`] configuration, and the
//! [`S3ErrorCode`]/[`S3Error`] pair the orchestration layer uses to turn
//! component errors into protocol responses.

pub mod config;
pub mod error;
mod types;

pub use config::S3LiteConfig;
pub use error::{S3Error, S3ErrorCode, S3LiteError, S3LiteResult};
pub use types::CanonicalUser;
