//! AWS Signature Version 2 request authentication for s3lite.
//!
//! An incoming request is signed as:
//!
//! ```text
//! Authorization: AWS <AWSAccessKeyId>:<Signature>
//! Signature = Base64(HMAC-SHA1(SecretAccessKey, StringToSign))
//! ```
//!
//! The [`Authenticator`] rebuilds the string to sign from the request facts,
//! looks up the secret in a [`UserDirectory`], compares signatures in
//! constant time and resolves the requestor's canonical identity. Requests
//! without an `Authorization` header are attributed to the anonymous user.
//!
//! # Modules
//!
//! - [`addressing`] - bucket/key resolution for path-style and virtual-hosted requests
//! - [`directory`] - user directory trait, in-memory store and user file loader
//! - [`signer`] - string-to-sign construction and client-side signing
//! - [`timestamp`] - request time parsing and the optional clock-skew check
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use s3lite_auth::{Authenticator, RequestSigner, StaticUserDirectory};
//! use s3lite_core::CanonicalUser;
//!
//! let mut directory = StaticUserDirectory::default();
//! directory.insert("AKID", "secret", CanonicalUser::with_display_name("alice-id", "alice"));
//! let authenticator = Authenticator::new(Arc::new(directory), "localhost");
//!
//! let (mut parts, ()) = http::Request::builder()
//!     .method("GET")
//!     .uri("/photos/cat.jpg")
//!     .header("host", "localhost")
//!     .header("date", "Tue, 27 Mar 2007 19:36:42 +0000")
//!     .body(())
//!     .unwrap()
//!     .into_parts();
//! RequestSigner::new("AKID", "secret", "localhost").sign(&mut parts).unwrap();
//!
//! let request = authenticator.authenticate(&parts).unwrap();
//! assert_eq!(request.requestor.id(), "alice-id");
//! assert_eq!(request.resource.key(), Some("cat.jpg"));
//! ```

pub mod addressing;
mod authenticator;
pub mod directory;
mod error;
pub mod signer;
pub mod timestamp;

pub use addressing::{ResourcePath, resolve_resource};
pub use authenticator::{AuthenticatedRequest, Authenticator};
pub use directory::{StaticUserDirectory, UserDirectory};
pub use error::AuthError;
pub use signer::{RequestSigner, authorization_header, sign, string_to_sign};
